// Purpose: Voice management, polyphony, MIDI handling
// This layer owns the tuning state and decides which voice plays which note

#[cfg(feature = "rtrb")]
pub mod handle;
pub mod message;
pub mod poly;
pub mod pool;
pub mod voice;

#[cfg(feature = "rtrb")]
pub use handle::{channel, SynthHandle};
pub use message::{MessageReceiver, SynthMessage};
pub use poly::{PolySynth, SynthSnapshot};
pub use voice::{SynthVoice, Voice, VoiceState};
