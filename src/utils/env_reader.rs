use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

pub struct EnvVariables {
    pub server_port: u16,
    pub database_url: String,
    pub storage_path: PathBuf,
    pub public_base_url: String,
    pub gemini_api_key: Option<String>,
}

impl EnvVariables {
    pub fn get_all() -> Self {
        let server_port = parse_var("SERVER_PORT", 8080);

        // Stored image URLs are built from this, so it must be the address
        // clients can actually reach
        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{server_port}"));

        Self {
            server_port,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://photobooth.db?mode=rwc".to_string()),
            storage_path: env::var("STORAGE_PATH")
                .unwrap_or_else(|_| "storage".to_string())
                .into(),
            public_base_url,
            gemini_api_key: env::var("GEMINI_API_KEY").ok().filter(|key| !key.is_empty()),
        }
    }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> T
where
    T::Err: Display,
{
    match env::var(key) {
        Ok(value) => match value.parse() {
            Ok(parsed) => parsed,
            Err(e) => panic!("Invalid {key} value `{value}`: {e}"),
        },
        Err(_) => default,
    }
}
