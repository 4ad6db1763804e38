pub mod guess;
pub use guess::{GuessAlphabet, Outcome};

pub mod invitations;
pub use invitations::InvitationId;

pub mod lifecycle;
pub use lifecycle::{AcceptError, GameEvent, GameSettings, Hangman};

pub mod presenter;
pub use presenter::{PresentError, Presenter, RenderToken};

pub mod session;
pub use session::GameSession;

mod store;

pub mod spotify;
pub use spotify::{SpotifyCredentials, SpotifyWords};

pub mod words;
pub use words::{StaticWords, Words};
