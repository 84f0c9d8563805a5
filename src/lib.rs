//! # Admin Panel
//!
//! `admin-panel` serves a small admin dashboard over a single `posts` resource.
//! It is headless: every page route answers with a JSON payload that a UI
//! layer renders, while the auth API mirrors the callbacks an admin frontend
//! expects (`login`, `logout`, `check`, `getIdentity`, ...).
//!
//! ## Authentication
//!
//! Authentication is a mock. One credential pair is configured at startup and
//! the only session state is a flag (the `email` cookie) holding the logged-in
//! email. There is no expiry, no rotation and no integrity protection on the
//! flag; anything presenting the cookie is treated as logged in.
//!
//! ## Routing
//!
//! Protected pages (`/`, `/posts/**` and the catch-all) run the auth check
//! before rendering and redirect to `/login` otherwise. Guest pages (`/login`,
//! `/register`, `/forgot-password`, `/update-password`) redirect authenticated
//! visitors to the posts list.
//!
//! ## Data
//!
//! Records come from a public REST API following the "simple REST" convention
//! (`_start`/`_end` pagination, `x-total-count` totals).

pub mod api;
pub mod auth;
pub mod cli;
pub mod data;
pub mod routes;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
