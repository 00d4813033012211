//! Bytecode representation

use std::{collections::BTreeMap, fmt, ops::Index};

use tracing::debug;

use crate::{
    error::{Bracket, SyntaxError},
    lexer::Lexer,
    optimizer,
    token::{Command, Token},
};

/// Supported instructions of the bytecode.
///
/// Every opcode first moves the cursor by `shift` cells, then applies its
/// effect. Runs of `>` and `<` never become opcodes of their own; they are
/// folded into the `shift` of the next opcode.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Opcode {
    /// Add `count` to the cell
    Add { shift: isize, count: usize },
    /// Subtract `count` from the cell
    Sub { shift: isize, count: usize },
    /// Set the cell to zero
    Clear { shift: isize },
    /// Add `cell * multiplier` to the cell at every offset, then clear the cell
    Copy {
        shift: isize,
        targets: BTreeMap<isize, u32>,
    },
    /// Move left until a zero cell is found
    ScanLeft { shift: isize },
    /// Move right until a zero cell is found
    ScanRight { shift: isize },
    /// Read one byte into the cell
    Input { shift: isize },
    /// Write the cell as one byte
    Output { shift: isize },
    /// Skip past `partner` if the cell is zero
    Open { shift: isize, partner: usize },
    /// Jump back behind `partner` if the cell is not zero
    Close { shift: isize, partner: usize },
}

impl Opcode {
    pub fn shift(&self) -> isize {
        match *self {
            Opcode::Add { shift, .. }
            | Opcode::Sub { shift, .. }
            | Opcode::Clear { shift }
            | Opcode::Copy { shift, .. }
            | Opcode::ScanLeft { shift }
            | Opcode::ScanRight { shift }
            | Opcode::Input { shift }
            | Opcode::Output { shift }
            | Opcode::Open { shift, .. }
            | Opcode::Close { shift, .. } => shift,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Opcode::Add { .. } => "add",
            Opcode::Sub { .. } => "sub",
            Opcode::Clear { .. } => "clear",
            Opcode::Copy { .. } => "copy",
            Opcode::ScanLeft { .. } => "scanl",
            Opcode::ScanRight { .. } => "scanr",
            Opcode::Input { .. } => "input",
            Opcode::Output { .. } => "output",
            Opcode::Open { .. } => "open",
            Opcode::Close { .. } => "close",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name(), self.shift())?;
        match self {
            Opcode::Add { count, .. } | Opcode::Sub { count, .. } => write!(f, " {}", count),
            Opcode::Copy { targets, .. } => write!(f, " {:?}", targets),
            Opcode::Open { partner, .. } | Opcode::Close { partner, .. } => {
                write!(f, " -> {}", partner)
            }
            _ => Ok(()),
        }
    }
}

/// Compiled program.
///
/// Every `Open` at index `i` names a `Close` whose partner is `i`, and the
/// other way around. Only the `Parser` builds programs, so this holds for
/// every `Program` that exists.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Program {
    opcodes: Vec<Opcode>,
}

impl Program {
    pub fn opcodes(&self) -> &[Opcode] {
        &self.opcodes
    }

    pub fn len(&self) -> usize {
        self.opcodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.opcodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Opcode> {
        self.opcodes.get(index)
    }
}

impl Index<usize> for Program {
    type Output = Opcode;

    fn index(&self, index: usize) -> &Opcode {
        &self.opcodes[index]
    }
}

/// Disassembly listing, one opcode per line
impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, opcode) in self.opcodes.iter().enumerate() {
            writeln!(f, "{:>6}  {}", index, opcode)?;
        }
        Ok(())
    }
}

/// Parser to generate bytecode from text
pub struct Parser {
    tokens: Vec<Token>,
    cursor: usize,
    /// Cursor movement not yet attached to an opcode
    shift: isize,
    /// Opcode index and source offset of every unclosed `Open`
    open_branches: Vec<(usize, usize)>,
    opcodes: Vec<Opcode>,
}

impl Parser {
    pub fn new(program: &str) -> Self {
        Parser {
            tokens: Lexer::new(program).tokenize(),
            cursor: 0,
            shift: 0,
            open_branches: Vec::new(),
            opcodes: Vec::new(),
        }
    }

    /// Parse the program and generate a `Program`
    pub fn parse(mut self) -> Result<Program, SyntaxError> {
        while let Some(token) = self.tokens.get(self.cursor).copied() {
            match token.command {
                Command::Right => {
                    let run = self.take_run() as isize;
                    self.shift += run;
                }
                Command::Left => {
                    let run = self.take_run() as isize;
                    self.shift -= run;
                }
                Command::Inc => {
                    let count = self.take_run();
                    let shift = self.take_shift();
                    self.opcodes.push(Opcode::Add { shift, count });
                }
                Command::Dec => {
                    let count = self.take_run();
                    let shift = self.take_shift();
                    self.opcodes.push(Opcode::Sub { shift, count });
                }
                Command::Open => self.parse_open(token),
                Command::Close => self.parse_close(token)?,
                Command::Input => {
                    self.cursor += 1;
                    let shift = self.take_shift();
                    self.opcodes.push(Opcode::Input { shift });
                }
                Command::Output => {
                    self.cursor += 1;
                    let shift = self.take_shift();
                    self.opcodes.push(Opcode::Output { shift });
                }
            }
        }

        if let Some(&(_, offset)) = self.open_branches.last() {
            return Err(SyntaxError {
                kind: Bracket::Open,
                offset,
            });
        }

        debug!(
            tokens = self.tokens.len(),
            opcodes = self.opcodes.len(),
            "compiled program"
        );

        Ok(Program {
            opcodes: self.opcodes,
        })
    }

    fn parse_open(&mut self, token: Token) {
        if let Some((opcode, consumed)) =
            optimizer::optimize_loop(&self.tokens[self.cursor..], self.shift)
        {
            self.shift = 0;
            self.cursor += consumed;
            self.opcodes.push(opcode);
            return;
        }

        // Partner is patched in once the matching `Close` shows up
        self.cursor += 1;
        let shift = self.take_shift();
        self.open_branches.push((self.opcodes.len(), token.offset));
        self.opcodes.push(Opcode::Open { shift, partner: 0 });
    }

    fn parse_close(&mut self, token: Token) -> Result<(), SyntaxError> {
        let (open, _) = self.open_branches.pop().ok_or(SyntaxError {
            kind: Bracket::Close,
            offset: token.offset,
        })?;

        let close = self.opcodes.len();
        if let Opcode::Open { partner, .. } = &mut self.opcodes[open] {
            *partner = close;
        }

        self.cursor += 1;
        let shift = self.take_shift();
        self.opcodes.push(Opcode::Close {
            shift,
            partner: open,
        });
        Ok(())
    }

    /// Consume a run of identical commands and return its length
    fn take_run(&mut self) -> usize {
        let command = self.tokens[self.cursor].command;
        let run = self.tokens[self.cursor..]
            .iter()
            .take_while(|token| token.command == command)
            .count();
        self.cursor += run;
        run
    }

    fn take_shift(&mut self) -> isize {
        std::mem::take(&mut self.shift)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(program: &str) -> Program {
        Parser::new(program).parse().unwrap()
    }

    #[test]
    fn runs_are_collapsed() {
        let program = parse("+++ -- +");
        assert_eq!(
            program.opcodes(),
            &[
                Opcode::Add { shift: 0, count: 3 },
                Opcode::Sub { shift: 0, count: 2 },
                Opcode::Add { shift: 0, count: 1 },
            ]
        );
    }

    #[test]
    fn moves_are_folded() {
        let program = parse(">>>+<.>><<<,");
        assert_eq!(
            program.opcodes(),
            &[
                Opcode::Add { shift: 3, count: 1 },
                Opcode::Output { shift: -1 },
                Opcode::Input { shift: -1 },
            ]
        );
    }

    #[test]
    fn trailing_moves_are_dropped() {
        let program = parse("+>>>");
        assert_eq!(program.opcodes(), &[Opcode::Add { shift: 0, count: 1 }]);
        assert!(parse("<<<").is_empty());
    }

    #[test]
    fn branches_are_resolved() {
        let program = parse(">[>[.]<]");
        assert_eq!(
            program.opcodes(),
            &[
                Opcode::Open {
                    shift: 1,
                    partner: 4
                },
                Opcode::Open {
                    shift: 1,
                    partner: 3
                },
                Opcode::Output { shift: 0 },
                Opcode::Close {
                    shift: 0,
                    partner: 1
                },
                // `<` folds into the outer close
                Opcode::Close {
                    shift: -1,
                    partner: 0
                },
            ]
        );
    }

    #[test]
    fn branch_partners_point_at_each_other() {
        let program = parse("[.[,]>[.]<]+[.]");
        for (index, opcode) in program.opcodes().iter().enumerate() {
            match *opcode {
                Opcode::Open { partner, .. } => {
                    assert!(matches!(program[partner], Opcode::Close { partner: p, .. } if p == index));
                }
                Opcode::Close { partner, .. } => {
                    assert!(matches!(program[partner], Opcode::Open { partner: p, .. } if p == index));
                }
                _ => {}
            }
        }
    }

    #[test]
    fn idioms_replace_loops() {
        let program = parse("+[-]>[->+<]<[<]>>[>]");
        assert_eq!(
            program.opcodes(),
            &[
                Opcode::Add { shift: 0, count: 1 },
                Opcode::Clear { shift: 0 },
                Opcode::Copy {
                    shift: 1,
                    targets: [(1, 1)].into_iter().collect()
                },
                Opcode::ScanLeft { shift: -1 },
                Opcode::ScanRight { shift: 2 },
            ]
        );
    }

    #[test]
    fn unmatched_open() {
        for program in ["[", "[[", "[][", "[[]", "[[[[[]]]]", "++++++>><<[", "[++[+[++>>]<<]", "[[++[+[++>>]]<<]"] {
            let err = Parser::new(program).parse().unwrap_err();
            assert_eq!(err.kind, Bracket::Open, "{}", program);
        }

        let err = Parser::new("+ [[]").parse().unwrap_err();
        assert_eq!(err.offset, 2);
    }

    #[test]
    fn unmatched_close() {
        for program in ["]", "[]]", "[[]]]", "[[[]]]]", "++++++>><<]", "]++++++>><<", "[[++[+[++>>]]<<]]]"] {
            let err = Parser::new(program).parse().unwrap_err();
            assert_eq!(err.kind, Bracket::Close, "{}", program);
        }

        let err = Parser::new("[-]]").parse().unwrap_err();
        assert_eq!(err.offset, 3);
    }

    #[test]
    fn display_listing() {
        let program = parse("++>[->+++<]<[.>]");
        assert_eq!(
            program.to_string(),
            "     0  add 0 2\n     1  copy 1 {1: 3}\n     2  open -1 -> 4\n     3  output 0\n     4  close 1 -> 2\n"
        );
    }
}
