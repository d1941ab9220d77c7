pub mod env_var {
    use std::time::Duration;

    use lazy_static::lazy_static;

    lazy_static! {
        static ref ENV_VAR: EnvVar = load_env();
    }

    /// Selected product and user store; Postgres always carries its connection settings.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum StorageKind {
        Postgres(DatabaseSettings),
        Memory,
    }

    #[derive(Debug, Clone)]
    pub struct JwtSettings {
        pub key: String,
        pub issuer: String,
        pub audience: String,
        pub expiration: Duration,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct DatabaseSettings {
        pub host: String,
        pub port: u16,
        pub name: String,
        pub user: String,
        pub password: String,
        pub url: String,
    }

    #[derive(Debug, Clone)]
    pub struct EnvVar {
        pub port: u16,
        pub jwt: JwtSettings,
        pub storage: StorageKind,
    }

    macro_rules! get_env {
        ($env:literal) => {
            std::env::var($env).expect(concat!("Missing env var ", $env))
        };
    }

    macro_rules! get_env_or {
        ($env:literal, $default:literal) => {
            std::env::var($env).unwrap_or_else(|_| $default.to_string())
        };
    }

    fn load_database() -> DatabaseSettings {
        let host = get_env!("DATABASE_HOST");
        let name = get_env!("DATABASE_NAME");
        let user = get_env!("DATABASE_USER");
        let password = get_env!("DATABASE_PASSWORD");
        let port: u16 = get_env!("DATABASE_PORT")
            .parse()
            .expect("Invalid DATABASE_PORT");

        let url = format!("postgres://{user}:{password}@{host}:{port}/{name}");

        DatabaseSettings {
            host,
            port,
            name,
            user,
            password,
            url,
        }
    }

    fn load_env() -> EnvVar {
        let port: u16 = get_env!("PORT").parse().expect("Invalid PORT");

        let expiration_minutes: u64 = get_env_or!("JWT_EXPIRATION_MINUTES", "60")
            .parse()
            .expect("Invalid JWT_EXPIRATION_MINUTES");
        let jwt = JwtSettings {
            key: get_env!("JWT_KEY"),
            issuer: get_env!("JWT_ISSUER"),
            audience: get_env!("JWT_AUDIENCE"),
            expiration: Duration::from_secs(expiration_minutes * 60),
        };

        let storage = storage_kind(&get_env_or!("STORAGE", "postgres"), load_database);

        EnvVar { port, jwt, storage }
    }

    fn storage_kind(kind: &str, database: impl FnOnce() -> DatabaseSettings) -> StorageKind {
        match kind {
            "postgres" => StorageKind::Postgres(database()),
            "memory" => StorageKind::Memory,
            other => panic!("Invalid STORAGE {other}, expected postgres or memory"),
        }
    }

    pub fn get() -> &'static EnvVar {
        &ENV_VAR
    }

}
