//! Credential storage and the browser-based login flow.

pub mod callback;
pub mod credentials;
pub mod flow;
pub mod pkce;

pub use credentials::{clear_config, config_path, load_config, resolve_api_key, save_config};
pub use flow::{
    get_auth_status, mask_key, run_login_flow, run_register_flow, AuthStatus, CredentialSource,
    LoginResult,
};
