use dotenvy::dotenv;
use lazy_static::lazy_static;
use secrecy::Secret;
use std::{env as std_env, time::Duration};

lazy_static! {
    pub static ref DATABASE_URL: Secret<String> = get_db_url();
    pub static ref POSTMARK_AUTH_TOKEN: Secret<String> =
        set_postmark_auth_token();
    pub static ref POSTMARK_EMAIL_SENDER_ADDRESS: Secret<String> =
        set_postmark_email_sender_address();
    pub static ref APP_ADDRESS: String =
        load_or_default(env::APP_ADDRESS_ENV_VAR, prod::APP_ADDRESS);
    pub static ref NOTIFICATION_QUEUE_CAPACITY: usize = load_number_or_default(
        env::NOTIFICATION_QUEUE_CAPACITY_ENV_VAR,
        DEFAULT_NOTIFICATION_QUEUE_CAPACITY
    );
    pub static ref RECONCILE_TIMEOUT: Duration =
        Duration::from_secs(load_number_or_default(
            env::RECONCILE_TIMEOUT_SECONDS_ENV_VAR,
            DEFAULT_RECONCILE_TIMEOUT_SECONDS
        ));
}

fn load_env() {
    dotenv().ok();
}

fn set_postmark_auth_token() -> Secret<String> {
    load_env();
    Secret::new(
        std_env::var(env::POSTMARK_AUTH_TOKEN_ENV_VAR)
            .expect("POSTMARK_AUTH_TOKEN must be set"),
    )
}

fn set_postmark_email_sender_address() -> Secret<String> {
    load_env();
    Secret::new(
        std_env::var(env::POSTMARK_EMAIL_SENDER_ADDRESS_ENV_VAR)
            .expect("POSTMARK_EMAIL_SENDER_ADDRESS must be set"),
    )
}

fn get_db_url() -> Secret<String> {
    load_env();
    let db_url = std_env::var(env::DATABASE_URL_ENV_VAR)
        .expect("DATABASE_URL must be set.");
    if db_url.is_empty() {
        panic!("DATABASE_URL must not be empty.");
    }
    Secret::new(db_url)
}

fn load_or_default(variable_name: &str, default_value: &str) -> String {
    load_env();

    match std_env::var(variable_name) {
        Ok(value) if !value.is_empty() => value,
        _ => String::from(default_value),
    }
}

fn load_number_or_default<T>(variable_name: &str, default_value: T) -> T
where
    T: std::str::FromStr,
{
    load_env();

    match std_env::var(variable_name).map(|value| value.parse::<T>()) {
        Ok(Ok(value)) => value,
        Ok(Err(_)) => {
            tracing::warn!(
                "{variable_name} is not a valid number, using the default"
            );
            default_value
        }
        Err(_) => default_value,
    }
}

pub mod env {
    pub const DATABASE_URL_ENV_VAR: &str = "DATABASE_URL";
    pub const POSTMARK_AUTH_TOKEN_ENV_VAR: &str = "POSTMARK_AUTH_TOKEN";
    pub const POSTMARK_EMAIL_SENDER_ADDRESS_ENV_VAR: &str =
        "POSTMARK_EMAIL_SENDER_ADDRESS";
    pub const APP_ADDRESS_ENV_VAR: &str = "APP_ADDRESS";
    pub const NOTIFICATION_QUEUE_CAPACITY_ENV_VAR: &str =
        "NOTIFICATION_QUEUE_CAPACITY";
    pub const RECONCILE_TIMEOUT_SECONDS_ENV_VAR: &str =
        "RECONCILE_TIMEOUT_SECONDS";
}

pub const GROUP_HEADER: &str = "x-group";
pub const DEFAULT_NOTIFICATION_QUEUE_CAPACITY: usize = 64;
pub const DEFAULT_RECONCILE_TIMEOUT_SECONDS: u64 = 60;

pub mod prod {
    pub const APP_ADDRESS: &str = "0.0.0.0:3000";
    pub mod email_client {
        use std::time::Duration;

        pub const BASE_URL: &str = "https://api.postmarkapp.com";
        pub const TIMEOUT: Duration = std::time::Duration::from_secs(10);
    }
}

pub mod test {
    pub const APP_ADDRESS: &str = "127.0.0.1:0";
    pub const GROUP: &str = "acme";
    pub mod email_client {
        use std::time::Duration;

        pub const SENDER: &str = "planning@acme.com";
        pub const TIMEOUT: Duration = std::time::Duration::from_millis(200);
    }
}
