//! Fonte de tempo injetável
//!
//! O serviço nunca lê o relógio do sistema diretamente: recebe um `Clock`,
//! o que permite instantes fixos nos testes.

use chrono::{DateTime, Local, NaiveDate, Utc};

pub trait Clock: Send + Sync {
    /// Instante atual, usado nos carimbos `created_at` / `updated_at`
    fn now(&self) -> DateTime<Utc>;

    /// Data civil de "hoje", usada na regra de data passada
    fn today(&self) -> NaiveDate;
}

/// Relógio do sistema; "hoje" é a data no fuso local do servidor
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub use manual::ManualClock;

#[cfg(any(test, feature = "test-utils"))]
mod manual {
    use super::Clock;
    use chrono::{DateTime, Duration, NaiveDate, Utc};
    use std::sync::Mutex;

    /// Relógio controlado pelos testes
    ///
    /// Cada chamada a `now()` devolve o instante corrente e depois avança
    /// `step`, de modo que carimbos sucessivos são estritamente crescentes.
    #[derive(Debug)]
    pub struct ManualClock {
        current: Mutex<DateTime<Utc>>,
        step: Duration,
    }

    impl ManualClock {
        pub fn new(start: DateTime<Utc>) -> Self {
            Self::with_step(start, Duration::seconds(1))
        }

        pub fn with_step(start: DateTime<Utc>, step: Duration) -> Self {
            Self {
                current: Mutex::new(start),
                step,
            }
        }

        pub fn advance(&self, by: Duration) {
            let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
            *current += by;
        }

        pub fn peek(&self) -> DateTime<Utc> {
            *self.current.lock().unwrap_or_else(|e| e.into_inner())
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
            let now = *current;
            *current += self.step;
            now
        }

        fn today(&self) -> NaiveDate {
            self.peek().date_naive()
        }
    }
}
