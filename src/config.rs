use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub db_file: String,
    pub frontend_origin: String,
}

impl Config {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(5000);
        let db_file = env::var("DB_FILE").unwrap_or_else(|_| "mockDatabase.json".to_string());
        let frontend_origin = env::var("FRONTEND_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3001".to_string());

        Self {
            port,
            db_file,
            frontend_origin,
        }
    }
}
