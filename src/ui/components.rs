mod select;
mod text_input;

pub use select::Select;
pub use text_input::{TextInput, TextInputEvent};
