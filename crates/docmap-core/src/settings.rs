//! Connector, entity and call-level configuration.
//!
//! Behavior toggles can be set at three tiers. [`Policy::resolve`] folds them
//! into one value per operation so the compilers never read ambient state.

use crate::driver::Transaction;

use bson::Document;
use serde::Deserialize;
use urlencoding::encode;

const DEFAULT_PROTOCOL: &str = "mongodb";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 27017;
const DEFAULT_DATABASE: &str = "test";

/// The seedlist protocol variant resolves hosts through DNS and never carries
/// a port.
const SEEDLIST_PROTOCOL: &str = "mongodb+srv";

/// Connector-level settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Full connection URL. Takes precedence over the individual parts.
    pub url: Option<String>,

    pub protocol: Option<String>,

    #[serde(alias = "hostname")]
    pub host: Option<String>,

    pub port: Option<u16>,

    #[serde(alias = "db")]
    pub database: Option<String>,

    #[serde(alias = "username")]
    pub user: Option<String>,

    pub password: Option<String>,

    pub strict_object_id_coercion: bool,

    pub disable_default_sort: bool,

    pub allow_extended_operators: bool,

    /// Use a single atomic find-and-upsert for `find_or_create`. Only enable
    /// against servers that support it.
    pub enable_optimized_find_or_create: bool,

    pub enable_geo_indexing: bool,

    /// Pass `null` equality through literally, letting the server match both
    /// null and missing fields.
    pub null_matches_absent: bool,
}

/// Entity-level settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Collection override. Defaults to the model name.
    pub collection: Option<String>,

    pub strict_object_id_coercion: Option<bool>,

    pub disable_default_sort: Option<bool>,

    pub allow_extended_operators: Option<bool>,
}

/// Call-level options.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub strict_object_id_coercion: Option<bool>,

    pub disable_default_sort: Option<bool>,

    pub allow_extended_operators: Option<bool>,

    /// Collation applied to `find` cursors
    pub collation: Option<Document>,

    /// Transaction context, passed through to the connection unchanged
    pub transaction: Option<Transaction>,
}

/// The resolved behavior toggles for a single operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Policy {
    pub strict_object_id_coercion: bool,
    pub disable_default_sort: bool,
    pub allow_extended_operators: bool,
    pub null_matches_absent: bool,
    pub enable_geo_indexing: bool,
}

impl Settings {
    /// The connection URL: `url` when set, otherwise
    /// `<protocol>://[user[:password]@]<host>[:port]/<database>`, with the
    /// credentials percent-encoded.
    pub fn url(&self) -> String {
        if let Some(url) = &self.url {
            return url.clone();
        }

        let protocol = self.protocol.as_deref().unwrap_or(DEFAULT_PROTOCOL);
        let host = self.host.as_deref().unwrap_or(DEFAULT_HOST);
        let database = self.database.as_deref().unwrap_or(DEFAULT_DATABASE);

        let port = if protocol == SEEDLIST_PROTOCOL {
            String::new()
        } else {
            format!(":{}", self.port.unwrap_or(DEFAULT_PORT))
        };

        let credentials = match (&self.user, &self.password) {
            (Some(user), Some(password)) => format!("{}:{}@", encode(user), encode(password)),
            (Some(user), None) => format!("{}@", encode(user)),
            (None, _) => String::new(),
        };

        format!("{protocol}://{credentials}{host}{port}/{database}")
    }
}

impl Policy {
    /// Resolves every toggle for one operation.
    ///
    /// Call-site options win over entity settings, which win over connector
    /// settings. Strict object-id coercion is the exception: it is on when
    /// any tier turns it on.
    pub fn resolve(settings: &Settings, model: &ModelSettings, options: &Options) -> Policy {
        Policy {
            strict_object_id_coercion: model.strict_object_id_coercion.unwrap_or(false)
                || settings.strict_object_id_coercion
                || options.strict_object_id_coercion.unwrap_or(false),
            disable_default_sort: tiered(
                options.disable_default_sort,
                model.disable_default_sort,
                settings.disable_default_sort,
            ),
            allow_extended_operators: tiered(
                options.allow_extended_operators,
                model.allow_extended_operators,
                settings.allow_extended_operators,
            ),
            null_matches_absent: settings.null_matches_absent,
            enable_geo_indexing: settings.enable_geo_indexing,
        }
    }
}

fn tiered(call: Option<bool>, model: Option<bool>, connector: bool) -> bool {
    call.or(model).unwrap_or(connector)
}
