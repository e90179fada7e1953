//! Catálogo de especialidades médicas
//!
//! CRUD simples sobre `SpecialtyStore`, com unicidade de nome na criação e
//! uma carga inicial quando o catálogo está vazio.

use std::sync::Arc;

use tracing::info;

use crate::error::SpecialtyError;
use crate::models::Specialty;
use crate::store::SpecialtyStore;

pub type Result<T> = std::result::Result<T, SpecialtyError>;

/// Especialidades inseridas por `seed_defaults`
pub fn default_specialties() -> Vec<Specialty> {
    vec![
        Specialty::new(
            "Medicina General",
            "Atención médica integral para el cuidado de la salud general del paciente.",
            "Dr. Carlos Rodríguez",
            "Consulta 101 - Piso 1",
            "https://example.com/medicina-general.jpg",
        ),
        Specialty::new(
            "Psicología",
            "Atención en salud mental y bienestar emocional del paciente.",
            "Dra. Ana García",
            "Consulta 201 - Piso 2",
            "https://example.com/psicologia.jpg",
        ),
        Specialty::new(
            "Ortopedia",
            "Especialidad médica dedicada al diagnóstico y tratamiento de lesiones del sistema musculoesquelético.",
            "Dr. Miguel Torres",
            "Consulta 301 - Piso 3",
            "https://example.com/ortopedia.jpg",
        ),
        Specialty::new(
            "Odontología",
            "Cuidado integral de la salud bucodental y tratamientos dentales especializados.",
            "Dra. Laura Martínez",
            "Consulta 401 - Piso 4",
            "https://example.com/odontologia.jpg",
        ),
    ]
}

#[derive(Clone)]
pub struct SpecialtyService {
    store: Arc<dyn SpecialtyStore>,
}

impl SpecialtyService {
    pub fn new(store: Arc<dyn SpecialtyStore>) -> Self {
        Self { store }
    }

    pub async fn list_all(&self) -> Result<Vec<Specialty>> {
        Ok(self.store.find_all().await?)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Specialty>> {
        Ok(self.store.find_by_id(id).await?)
    }

    /// Busca sem diferenciar maiúsculas de minúsculas
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Specialty>> {
        Ok(self.store.find_by_name_ignore_case(name).await?)
    }

    /// Cria uma especialidade; o nome exato não pode existir ainda
    pub async fn create(&self, specialty: Specialty) -> Result<Specialty> {
        if self.store.exists_by_name(&specialty.name).await? {
            return Err(SpecialtyError::DuplicateName(specialty.name));
        }
        let saved = self.store.save(Specialty { id: None, ..specialty }).await?;
        info!("Especialidade {} criada", saved.name);
        Ok(saved)
    }

    /// Substitui todos os campos da especialidade `id`
    pub async fn update(&self, id: &str, replacement: Specialty) -> Result<Specialty> {
        let existing = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| SpecialtyError::NotFound(id.to_string()))?;

        let updated = Specialty {
            id: existing.id,
            ..replacement
        };
        Ok(self.store.save(updated).await?)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        if !self.store.exists_by_id(id).await? {
            return Err(SpecialtyError::NotFound(id.to_string()));
        }
        self.store.delete_by_id(id).await?;
        Ok(())
    }

    /// Comparação exata do nome
    pub async fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.store.exists_by_name(name).await?)
    }

    /// Insere o catálogo padrão se não houver nenhuma especialidade
    ///
    /// Devolve quantas especialidades foram inseridas.
    pub async fn seed_defaults(&self) -> Result<usize> {
        if self.store.count().await? > 0 {
            return Ok(0);
        }
        let saved = self.store.save_all(default_specialties()).await?;
        info!("Catálogo inicial com {} especialidades carregado", saved.len());
        Ok(saved.len())
    }
}
