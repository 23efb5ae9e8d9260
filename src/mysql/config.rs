use mysql_async::{Conn, OptsBuilder};

use super::executor::MysqlConnection;
use crate::config::ConnectionConfig;
use crate::error::CrudDbError;

pub(crate) fn build_opts(config: &ConnectionConfig) -> OptsBuilder {
    let mut opts = OptsBuilder::default()
        .ip_or_hostname(config.host.clone())
        .user(Some(config.username.clone()))
        .pass(Some(config.password.clone()))
        .db_name(Some(config.database.clone()));
    if let Some(port) = config.effective_port() {
        opts = opts.tcp_port(port);
    }
    opts
}

impl MysqlConnection {
    /// Open one connection to a `MySQL` or `MariaDB` server.
    ///
    /// # Errors
    /// Returns `CrudDbError::ConfigError` if required config fields are missing or
    /// `CrudDbError::ConnectionError` if the server cannot be reached or rejects the login.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self, CrudDbError> {
        config.validate()?;
        let conn = Conn::new(build_opts(config)).await.map_err(|e| {
            CrudDbError::ConnectionError(format!("Failed to connect to MySQL: {e}"))
        })?;
        Ok(Self::new(conn, config.database.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DatabaseType;
    use mysql_async::Opts;

    #[test]
    fn opts_carry_config_fields() {
        let cfg = ConnectionConfig::new(DatabaseType::Mysql)
            .host("db.internal")
            .username("app")
            .password("s3cret")
            .database("shop");
        let opts = Opts::from(build_opts(&cfg));
        assert_eq!(opts.ip_or_hostname(), "db.internal");
        assert_eq!(opts.tcp_port(), 3306);
        assert_eq!(opts.user(), Some("app"));
        assert_eq!(opts.pass(), Some("s3cret"));
        assert_eq!(opts.db_name(), Some("shop"));
    }

    #[test]
    fn explicit_port_wins() {
        let cfg = ConnectionConfig::new(DatabaseType::Mysql).port(3307);
        let opts = Opts::from(build_opts(&cfg));
        assert_eq!(opts.tcp_port(), 3307);
    }
}
