use axum::Json;
use serde_json::{json, Value};

use crate::built_info;

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": built_info::PKG_NAME,
        "version": built_info::PKG_VERSION,
    }))
}
