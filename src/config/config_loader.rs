use anyhow::{Ok, Result};

use super::config_model::{Database, DotEnvyConfig, JwtSecret, Server, Smtp};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let server = Server {
        port: std::env::var("SERVER_PORT")
            .expect("SERVER_PORT is invalid")
            .parse()?,
        body_limit: std::env::var("SERVER_BODY_LIMIT")
            .expect("SERVER_BODY_LIMIT is invalid")
            .parse()?,
        timeout: std::env::var("SERVER_TIMEOUT")
            .expect("SERVER_TIMEOUT is invalid")
            .parse()?,
    };

    let database = Database {
        url: std::env::var("DATABASE_URL").expect("DATABASE_URL is invalid"),
    };

    let smtp = Smtp {
        host: std::env::var("SMTP_HOST").expect("SMTP_HOST is invalid"),
        port: std::env::var("SMTP_PORT")
            .expect("SMTP_PORT is invalid")
            .parse()?,
        username: std::env::var("SMTP_USERNAME").ok(),
        password: std::env::var("SMTP_PASSWORD").ok(),
        from_address: std::env::var("SMTP_FROM_ADDRESS").expect("SMTP_FROM_ADDRESS is invalid"),
        use_tls: std::env::var("SMTP_USE_TLS")
            .unwrap_or_else(|_| "false".to_string())
            .parse()?,
    };

    Ok(DotEnvyConfig {
        server,
        database,
        smtp,
    })
}

pub fn get_jwt_secret() -> Result<JwtSecret> {
    dotenvy::dotenv().ok();

    Ok(JwtSecret {
        secret: std::env::var("JWT_SECRET").expect("JWT_SECRET is invalid"),
    })
}
