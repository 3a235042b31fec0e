use clap::Parser;
use serde::Deserialize;

use handle_errors::Error;

/// 명령행 인자
///
/// 주어진 값은 setup.toml과 환경 변수보다 우선한다.
#[derive(Parser, Debug, Default, PartialEq)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// 로그 수준 (error, warn, info, debug, trace)
    #[clap(short, long)]
    pub log_level: Option<String>,
    /// 웹 서버가 바인딩할 포트
    #[clap(short, long)]
    pub port: Option<u16>,
    /// PostgreSQL 호스트
    #[clap(long)]
    pub database_host: Option<String>,
    /// PostgreSQL 포트
    #[clap(long)]
    pub database_port: Option<u16>,
    /// 데이터베이스 이름
    #[clap(long)]
    pub database_name: Option<String>,
}

#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct Config {
    pub log_level: String,
    pub port: u16,
    pub database_host: String,
    pub database_port: u16,
    pub database_name: String,
    pub database_user: String,
    pub database_password: String,
}

impl Config {
    /// 기본값 < setup.toml < 환경 변수(.env 포함) < 명령행 인자 순으로 설정을 읽는다.
    pub fn new() -> Result<Config, Error> {
        dotenv::dotenv().ok();

        Config::from_sources(
            config::File::with_name("setup").required(false),
            |key| std::env::var(key).ok(),
            Args::parse(),
        )
    }

    pub fn from_sources<S, E>(file: S, env: E, args: Args) -> Result<Config, Error>
    where
        S: config::Source + Send + Sync + 'static,
        E: Fn(&str) -> Option<String>,
    {
        let settings = config::Config::builder()
            .set_default("log_level", "warn")
            .and_then(|b| b.set_default("port", 8080_i64))
            .and_then(|b| b.set_default("database_host", "localhost"))
            .and_then(|b| b.set_default("database_port", 5432_i64))
            .and_then(|b| b.set_default("database_name", "polls"))
            .and_then(|b| b.set_default("database_user", "postgres"))
            .and_then(|b| b.set_default("database_password", ""))
            .map_err(Error::ConfigError)?
            .add_source(file)
            .build()
            .map_err(Error::ConfigError)?;

        let mut config: Config = settings.try_deserialize().map_err(Error::ConfigError)?;

        // 배포 환경에서 쓰는 변수 이름을 그대로 따른다.
        if let Some(port) = env("PORT") {
            config.port = port.parse::<u16>().map_err(Error::ParseError)?;
        }
        if let Some(host) = env("POSTGRES_HOST") {
            config.database_host = host;
        }
        if let Some(port) = env("POSTGRES_PORT") {
            config.database_port = port.parse::<u16>().map_err(Error::ParseError)?;
        }
        if let Some(name) = env("POSTGRES_DB") {
            config.database_name = name;
        }
        if let Some(user) = env("POSTGRES_USER") {
            config.database_user = user;
        }
        if let Some(password) = env("POSTGRES_PASSWORD") {
            config.database_password = password;
        }

        if let Some(log_level) = args.log_level {
            config.log_level = log_level;
        }
        if let Some(port) = args.port {
            config.port = port;
        }
        if let Some(host) = args.database_host {
            config.database_host = host;
        }
        if let Some(port) = args.database_port {
            config.database_port = port;
        }
        if let Some(name) = args.database_name {
            config.database_name = name;
        }

        Ok(config)
    }

    pub fn database_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.database_user,
            self.database_password,
            self.database_host,
            self.database_port,
            self.database_name
        )
    }

    /// RUST_LOG가 없을 때 쓰는 추적 필터
    pub fn log_filter(&self) -> String {
        format!("polls={},warp={}", self.log_level, self.log_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use config::{File, FileFormat};

    fn toml(contents: &str) -> File<config::FileSourceString, FileFormat> {
        File::from_str(contents, FileFormat::Toml)
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_apply_without_any_source() {
        let config = Config::from_sources(toml(""), no_env, Args::default()).unwrap();

        assert_eq!(
            config,
            Config {
                log_level: "warn".to_string(),
                port: 8080,
                database_host: "localhost".to_string(),
                database_port: 5432,
                database_name: "polls".to_string(),
                database_user: "postgres".to_string(),
                database_password: "".to_string(),
            }
        );
        assert_eq!(config.database_url(), "postgres://postgres:@localhost:5432/polls");
        assert_eq!(config.log_filter(), "polls=warn,warp=warn");
    }

    #[test]
    fn args_override_env_which_overrides_file() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("PORT", "9000"),
            ("POSTGRES_USER", "polls_user"),
            ("POSTGRES_PASSWORD", "secret"),
        ]);
        let args = Args::parse_from(["polls", "--port", "3030", "--database-name", "polls_test"]);

        let config = Config::from_sources(
            toml("port = 7000\nlog_level = \"info\"\ndatabase_host = \"db\""),
            |key| env.get(key).map(|v| v.to_string()),
            args,
        )
        .unwrap();

        assert_eq!(config.port, 3030);
        assert_eq!(config.log_level, "info");
        assert_eq!(
            config.database_url(),
            "postgres://polls_user:secret@db:5432/polls_test"
        );
    }

    #[test]
    fn invalid_port_in_env_is_a_parse_error() {
        let result = Config::from_sources(
            toml(""),
            |key| (key == "POSTGRES_PORT").then(|| "not-a-port".to_string()),
            Args::default(),
        );

        assert!(matches!(result, Err(Error::ParseError(_))));
    }
}
