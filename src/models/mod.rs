use chrono::{DateTime, Utc};

pub mod admin;
pub mod menu;
pub mod usuario;

/// Login-capable records: those with a password hash and a profile photo.
pub trait Account {
    fn contrasena(&self) -> &str;
    fn set_contrasena(&mut self, digest: String);
    fn set_foto_perfil(&mut self, foto: Option<String>);
    fn touch(&mut self, now: DateTime<Utc>);
}

impl Account for admin::Admin {
    fn contrasena(&self) -> &str {
        &self.contrasena
    }

    fn set_contrasena(&mut self, digest: String) {
        self.contrasena = digest;
    }

    fn set_foto_perfil(&mut self, foto: Option<String>) {
        self.foto_perfil = foto;
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

impl Account for usuario::Usuario {
    fn contrasena(&self) -> &str {
        &self.contrasena
    }

    fn set_contrasena(&mut self, digest: String) {
        self.contrasena = digest;
    }

    fn set_foto_perfil(&mut self, foto: Option<String>) {
        self.foto_perfil = foto;
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}
