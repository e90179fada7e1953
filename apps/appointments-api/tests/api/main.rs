mod appointments;
mod helpers;
mod specialties;
