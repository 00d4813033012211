/// The eight command characters of the language.
/// Every other byte in a source text is a comment.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Command {
    Right,
    Left,
    Inc,
    Dec,
    Open,
    Close,
    Input,
    Output,
}

impl Command {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'>' => Some(Command::Right),
            b'<' => Some(Command::Left),
            b'+' => Some(Command::Inc),
            b'-' => Some(Command::Dec),
            b'[' => Some(Command::Open),
            b']' => Some(Command::Close),
            b',' => Some(Command::Input),
            b'.' => Some(Command::Output),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Command::Right => '>',
            Command::Left => '<',
            Command::Inc => '+',
            Command::Dec => '-',
            Command::Open => '[',
            Command::Close => ']',
            Command::Input => ',',
            Command::Output => '.',
        }
    }
}

/// A command together with its byte offset in the source text.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Token {
    pub command: Command,
    pub offset: usize,
}

impl Token {
    pub fn new(command: Command, offset: usize) -> Self {
        Token { command, offset }
    }
}
