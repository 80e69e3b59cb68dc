use db::pagination::DEFAULT_PER_PAGE;
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub web: Web,
    pub database: Database,
    #[serde(default)]
    pub listing: Listing,
    #[serde(default)]
    pub rpc: Rpc,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Web {
    #[serde(default = "port_default")]
    pub port: u16,
    #[serde(default = "host_default")]
    pub host: String,
    #[serde(default = "login_url_default")]
    pub login_url: String,
    #[serde(default)]
    pub secure_cookies: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Database {
    pub uri: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Listing {
    #[serde(default = "per_page_default")]
    pub per_page: u32,
    /// `max-age` of the index page
    #[serde(default = "index_cache_seconds_default")]
    pub index_cache_seconds: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Rpc {
    #[serde(default = "socket_default")]
    pub socket: String,
}

impl Default for Web {
    fn default() -> Self {
        Self {
            port: port_default(),
            host: host_default(),
            login_url: login_url_default(),
            secure_cookies: false,
        }
    }
}

impl Default for Listing {
    fn default() -> Self {
        Self {
            per_page: per_page_default(),
            index_cache_seconds: index_cache_seconds_default(),
        }
    }
}

impl Default for Rpc {
    fn default() -> Self {
        Self {
            socket: socket_default(),
        }
    }
}

impl Config {
    /// Settings for tests and local tooling that never open a database.
    pub fn local() -> Self {
        Self {
            web: Web::default(),
            database: Database { uri: String::new() },
            listing: Listing::default(),
            rpc: Rpc::default(),
        }
    }
}

fn host_default() -> String {
    String::from("0.0.0.0")
}

fn port_default() -> u16 {
    8081
}

fn login_url_default() -> String {
    String::from("/auth/login/")
}

fn per_page_default() -> u32 {
    DEFAULT_PER_PAGE
}

fn index_cache_seconds_default() -> u32 {
    20
}

fn socket_default() -> String {
    String::from("quill.rpc")
}
