//! Application state

use sqlx::PgPool;

use crate::config::Config;
use crate::email::EmailService;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// SES-backed mailer for one-time codes
    pub email: EmailService,
    /// JWT secret for seller authentication
    pub jwt_secret: String,
    /// Session token lifetime in minutes
    pub token_ttl_minutes: i64,
}

impl AppState {
    /// Create a new AppState
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let ses = if let Ok(ses_region) = std::env::var("SES_REGION") {
            let ses_config = aws_config
                .to_builder()
                .region(aws_config::Region::new(ses_region))
                .build();
            aws_sdk_sesv2::Client::new(&ses_config)
        } else {
            aws_sdk_sesv2::Client::new(&aws_config)
        };

        Ok(Self {
            pool,
            email: EmailService::new(ses, config.mail_from.clone()),
            jwt_secret: config.jwt_secret.clone(),
            token_ttl_minutes: config.token_ttl_minutes,
        })
    }
}
