use std::sync::Arc;
use bb8::Pool;
use bb8_tiberius::ConnectionManager;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use serenity::prelude::TypeMapKey;
use tiberius::{AuthMethod, Config};
use tracing::info;

use crate::Error;

pub struct Database {
    pub pool: Pool<ConnectionManager>
}

impl TypeMapKey for Database {
    type Value = Arc<Database>;
}

impl Database {
    pub async fn new(ip: &str, port: u16, user: &str, pass: &str, database: &str) -> Result<Self, Error> {
        let mut config = Config::new();

        config.host(ip);
        config.port(port);
        config.database(database);
        config.authentication(AuthMethod::sql_server(user, pass));
        config.trust_cert();

        let manager = ConnectionManager::new(config);
        let pool = Pool::builder()
            .max_size(4)
            .build(manager)
            .await?;

        info!("Connected to SQL Server at {}:{} ({})", ip, port, database);

        Ok(Database { pool })
    }
}

// Discord snowflakes don't fit in BIGINT's signed range, so they're stored as DECIMAL(20, 0).
pub fn to_decimal(id: u64) -> Decimal {
    Decimal::from(id)
}

pub fn from_decimal(value: Option<Decimal>) -> u64 {
    value.and_then(|o| o.to_u64()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snowflakes_survive_decimal_storage() {
        let id = 711_323_223_891_116_043u64;
        assert_eq!(from_decimal(Some(to_decimal(id))), id);
        assert_eq!(from_decimal(Some(to_decimal(u64::MAX))), u64::MAX);
        assert_eq!(from_decimal(None), 0);
    }
}
