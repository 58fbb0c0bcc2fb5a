//! Service layer
//!
//! Request flows shared by the HTTP handlers and the CLI. External
//! collaborators (token endpoint, Wallabag, SMTP) sit behind traits.

pub mod indieauth;
pub mod mailer;
pub mod micropub;
pub mod queue;
pub mod resolver;
pub mod search;
pub mod wallabag;
pub mod webhook;
pub mod webmention;

pub use indieauth::{IndieAuthVerifier, TokenInfo, TokenVerifier};
pub use mailer::{Mailer, SmtpMailer};
pub use micropub::{MicropubService, Publication};
pub use queue::PostQueue;
pub use resolver::{Resolution, Resolver};
pub use search::{SearchResult, SearchService};
pub use wallabag::{Bookmarker, WallabagClient};
pub use webhook::WebhookService;
pub use webmention::{Mention, MentionForm, WebmentionService};
