//! Interactive console: prompt, input, interrupts and the dispatch loop

pub mod input;
pub mod interrupt;
pub mod prompt;
pub mod repl;

pub use input::{EditorReader, LineReader, ReadOutcome, ScriptedReader};
pub use interrupt::InterruptFlag;
pub use prompt::{render_prompt, Palette};
pub use repl::{fault_line, parse_error_line, LoopState, Terminal};
