pub use lexer::{PostScriptLexer, Token};

pub(crate) use lexer::find_subslice;

mod lexer;
