pub mod channel;
pub mod contact;
pub mod message;

pub use channel::Channel;
pub use contact::{Contact, NewContact};
pub use message::{Direction, Message, MessageStatus, NewMessage};
