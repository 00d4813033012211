//! Loop idiom recognition
//!
//! Each recognizer looks at the tokens starting at a `[` and either declines
//! or returns a single opcode with the same effect as the whole loop, plus
//! the number of tokens it replaces. Declining is never an error: the
//! compiler falls back to a generic loop.

use std::collections::BTreeMap;

use crate::{
    bytecode::Opcode,
    token::{Command, Token},
};

type Recognized = Option<(Opcode, usize)>;
type LoopOptimizer = fn(&[Token], isize) -> Recognized;

/// Recognizers in priority order
static LOOP_OPTIMIZERS: [LoopOptimizer; 3] = [clear_loop, copy_loop, scan_loop];

/// Run every recognizer on the loop starting at `tokens[0]` and return the
/// first match.
pub fn optimize_loop(tokens: &[Token], shift: isize) -> Recognized {
    LOOP_OPTIMIZERS
        .iter()
        .find_map(|optimizer| optimizer(tokens, shift))
}

fn commands<const N: usize>(tokens: &[Token]) -> Option<[Command; N]> {
    let window = tokens.get(..N)?;
    let mut commands = [Command::Open; N];
    for (command, token) in commands.iter_mut().zip(window) {
        *command = token.command;
    }
    Some(commands)
}

/// `[-]` or `[+]`
pub fn clear_loop(tokens: &[Token], shift: isize) -> Recognized {
    match commands::<3>(tokens)? {
        [Command::Open, Command::Dec | Command::Inc, Command::Close] => {
            Some((Opcode::Clear { shift }, 3))
        }
        _ => None,
    }
}

/// `[>]` or `[<]`
pub fn scan_loop(tokens: &[Token], shift: isize) -> Recognized {
    match commands::<3>(tokens)? {
        [Command::Open, Command::Right, Command::Close] => Some((Opcode::ScanRight { shift }, 3)),
        [Command::Open, Command::Left, Command::Close] => Some((Opcode::ScanLeft { shift }, 3)),
        _ => None,
    }
}

/// Copy and multiply loops such as `[->+>++<<]` or the mirrored `[-<+<<+++>>>]`.
///
/// The body decrements the current cell once, walks away from it in one
/// direction adding to the cells it passes, then walks straight back.
pub fn copy_loop(tokens: &[Token], shift: isize) -> Recognized {
    let command = |index: usize| tokens.get(index).map(|token| token.command);

    if command(0)? != Command::Open || command(1)? != Command::Dec {
        return None;
    }

    let (outward, inward, step) = match command(2)? {
        Command::Right => (Command::Right, Command::Left, 1),
        Command::Left => (Command::Left, Command::Right, -1),
        _ => return None,
    };

    let mut targets = BTreeMap::new();
    let mut depth = 0isize;
    let mut mult = 0u32;
    let mut index = 2;

    // Walk away from the source cell, tallying increments per depth
    loop {
        match command(index)? {
            Command::Inc => mult += 1,
            c if c == outward || c == inward => {
                if mult > 0 {
                    *targets.entry(depth).or_insert(0) += mult;
                    mult = 0;
                }
                if c == inward {
                    break;
                }
                depth += step;
            }
            _ => return None,
        }
        index += 1;
    }

    // Walk back, nothing but moves toward the source cell
    while command(index)? == inward {
        depth -= step;
        index += 1;
    }

    if command(index)? != Command::Close || depth != 0 || targets.is_empty() {
        return None;
    }

    Some((Opcode::Copy { shift, targets }, index + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn recognize(optimizer: LoopOptimizer, program: &str) -> Recognized {
        optimizer(&Lexer::new(program).tokenize(), 0)
    }

    fn copy(pairs: &[(isize, u32)]) -> Opcode {
        Opcode::Copy {
            shift: 0,
            targets: pairs.iter().copied().collect(),
        }
    }

    #[test]
    fn clear() {
        assert_eq!(
            recognize(clear_loop, "[-]"),
            Some((Opcode::Clear { shift: 0 }, 3))
        );
        assert_eq!(
            recognize(clear_loop, "[+]>>"),
            Some((Opcode::Clear { shift: 0 }, 3))
        );
        assert_eq!(recognize(clear_loop, "[--]"), None);
        assert_eq!(recognize(clear_loop, "[-"), None);
        assert_eq!(
            clear_loop(&Lexer::new("[-]").tokenize(), -3),
            Some((Opcode::Clear { shift: -3 }, 3))
        );
    }

    #[test]
    fn scan() {
        assert_eq!(
            recognize(scan_loop, "[>]"),
            Some((Opcode::ScanRight { shift: 0 }, 3))
        );
        assert_eq!(
            recognize(scan_loop, "[<]"),
            Some((Opcode::ScanLeft { shift: 0 }, 3))
        );
        assert_eq!(recognize(scan_loop, "[>>]"), None);
        assert_eq!(recognize(scan_loop, "[-]"), None);
    }

    #[test]
    fn copy_right() {
        assert_eq!(recognize(copy_loop, "[->+<]"), Some((copy(&[(1, 1)]), 6)));
        assert_eq!(
            recognize(copy_loop, "[->++>>+++<<<]"),
            Some((copy(&[(1, 2), (3, 3)]), 14))
        );
        // Increments right before turning back count too
        assert_eq!(
            recognize(copy_loop, "[->>++++<<]"),
            Some((copy(&[(2, 4)]), 11))
        );
    }

    #[test]
    fn copy_left() {
        assert_eq!(recognize(copy_loop, "[-<+>]"), Some((copy(&[(-1, 1)]), 6)));
        assert_eq!(
            recognize(copy_loop, "[-<<++<+++>>>]"),
            Some((copy(&[(-2, 2), (-3, 3)]), 14))
        );
    }

    #[test]
    fn copy_rejects() {
        // Does not start with a decrement
        assert_eq!(recognize(copy_loop, "[>+<-]"), None);
        // Does not return to the source cell
        assert_eq!(recognize(copy_loop, "[->+<<]"), None);
        assert_eq!(recognize(copy_loop, "[->>+<]"), None);
        // Foreign commands in the body
        assert_eq!(recognize(copy_loop, "[->+.<]"), None);
        assert_eq!(recognize(copy_loop, "[->-<]"), None);
        assert_eq!(recognize(copy_loop, "[->+<+]"), None);
        // Touches the source cell again
        assert_eq!(recognize(copy_loop, "[-+>+<]"), None);
        // Changes direction twice
        assert_eq!(recognize(copy_loop, "[->+<>]"), None);
        // No increments at all
        assert_eq!(recognize(copy_loop, "[->><<]"), None);
        // Nested loop
        assert_eq!(recognize(copy_loop, "[->[+]<]"), None);
        // Truncated
        assert_eq!(recognize(copy_loop, "[->+<"), None);
    }

    #[test]
    fn priority() {
        assert_eq!(
            optimize_loop(&Lexer::new("[-]").tokenize(), 1),
            Some((Opcode::Clear { shift: 1 }, 3))
        );
        assert_eq!(
            optimize_loop(&Lexer::new("[-  >+ <]").tokenize(), 0),
            Some((copy(&[(1, 1)]), 6))
        );
        assert_eq!(
            optimize_loop(&Lexer::new("[<]").tokenize(), 2),
            Some((Opcode::ScanLeft { shift: 2 }, 3))
        );
        assert_eq!(optimize_loop(&Lexer::new("[.]").tokenize(), 0), None);
    }
}
