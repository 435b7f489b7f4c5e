//! Command-line interface for the `h5lzo` binary.
//!
//! | Submodule     | Responsibility                                     |
//! |---------------|----------------------------------------------------|
//! | [`constants`] | program name, extension, `DISPLAY_LEVEL` + macros  |
//! | [`op_mode`]   | [`OpMode`](op_mode::OpMode) and extension sniffing |
//! | [`args`]      | clap arguments and their resolution into `Prefs`   |

pub mod args;
pub mod constants;
pub mod op_mode;
