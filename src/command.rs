use std::hash::BuildHasher;
use std::io;
use std::io::BufRead;
use std::io::Write;

use crate::Cost;
use crate::HashTable;

/// Splits off the first whitespace-delimited token, returning it together
/// with the unconsumed remainder of the line.
fn split_token(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.find(char::is_whitespace) {
        Some(at) => (&input[..at], &input[at..]),
        None => (input, ""),
    }
}

/// Executes a single non-blank command line against the table.
///
/// Unknown verbs and missing arguments are reported on `output` as
/// `Invalid command: <line>`; they are not errors. An `Err` from this
/// function means the output stream itself failed.
fn dispatch<W, S>(
    table: &mut HashTable<String, String, S>,
    line: &str,
    output: &mut W,
    cost: Cost,
) -> io::Result<()>
where
    W: Write,
    S: BuildHasher,
{
    let (verb, rest) = split_token(line);
    let (key, rest) = split_token(rest);
    // The value is the remainder of the line and may itself contain
    // whitespace.
    let value = rest.trim_start();

    match verb.to_ascii_lowercase().as_str() {
        "insert" => {
            if key.is_empty() || value.is_empty() {
                return writeln!(output, "Invalid command: {line}");
            }
            table.insert(key.to_owned(), value.to_owned(), cost);
        }
        "remove" => {
            if key.is_empty() {
                return writeln!(output, "Invalid command: {line}");
            }
            table.remove(&key.to_owned(), cost);
        }
        "lookup" => {
            if key.is_empty() {
                return writeln!(output, "Invalid command: {line}");
            }
            // A miss prints nothing.
            if let Some(value) = table.get(&key.to_owned(), cost) {
                writeln!(output, "{value}")?;
            }
        }
        "findall" => {
            let keys: Vec<&str> = table.keys().map(String::as_str).collect();
            writeln!(output, "[{}]", keys.join(", "))?;
        }
        _ => writeln!(output, "Invalid command: {line}")?,
    }

    Ok(())
}

/// Reads whitespace-delimited commands from `input` until end of input and
/// executes them against `table`, writing results to `output`.
///
/// Recognized verbs, case-insensitive: `insert <key> <value>`,
/// `remove <key>`, `lookup <key>` and `findall`. Blank lines are skipped.
/// A failing command is reported as
/// `Error processing command: <line> - <message>` and the session continues
/// with the next line; it never aborts on a single bad command.
///
/// # Examples
///
/// ```rust
/// use chain_hash::Cost;
/// use chain_hash::HashTable;
/// use chain_hash::command;
///
/// let script = "insert a 1\nlookup a\n";
/// let mut table = HashTable::new();
/// let mut output = Vec::new();
/// command::run(&mut table, script.as_bytes(), &mut output, Cost::Constant).unwrap();
///
/// assert_eq!(output, b"1\n");
/// ```
pub fn run<R, W, S>(
    table: &mut HashTable<String, String, S>,
    input: R,
    mut output: W,
    cost: Cost,
) -> io::Result<()>
where
    R: BufRead,
    W: Write,
    S: BuildHasher,
{
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if let Err(err) = dispatch(table, &line, &mut output, cost) {
            writeln!(output, "Error processing command: {line} - {err}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn session(script: &str) -> String {
        let mut table = HashTable::new();
        let mut output = Vec::new();
        run(&mut table, script.as_bytes(), &mut output, Cost::LogN).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn insert_lookup_remove_round_trip() {
        let output = session(
            "insert a 1\n\
             insert b 2\n\
             lookup a\n\
             lookup b\n\
             remove a\n\
             lookup a\n",
        );
        // The lookup after the removal prints nothing.
        assert_eq!(output, "1\n2\n");
    }

    #[test]
    fn value_keeps_embedded_whitespace() {
        let output = session(
            "insert greeting hello   world\n\
             lookup greeting\n",
        );
        assert_eq!(output, "hello   world\n");
    }

    #[test]
    fn verbs_are_case_insensitive() {
        let output = session(
            "INSERT k v\n\
             Lookup k\n\
             REMOVE k\n\
             lookup k\n",
        );
        assert_eq!(output, "v\n");
    }

    #[test]
    fn blank_lines_are_skipped() {
        let output = session("\n   \ninsert k v\n\nlookup k\n");
        assert_eq!(output, "v\n");
    }

    #[test]
    fn unknown_verb_is_invalid() {
        let output = session("frobnicate a b\n");
        assert_eq!(output, "Invalid command: frobnicate a b\n");
    }

    #[test]
    fn missing_arguments_are_invalid() {
        let output = session(
            "insert onlykey\n\
             insert\n\
             remove\n\
             lookup\n",
        );
        assert_eq!(
            output,
            "Invalid command: insert onlykey\n\
             Invalid command: insert\n\
             Invalid command: remove\n\
             Invalid command: lookup\n"
        );
    }

    #[test]
    fn removing_an_absent_key_prints_nothing() {
        let output = session("remove ghost\n");
        assert_eq!(output, "");
    }

    #[test]
    fn findall_prints_every_key_once() {
        let output = session(
            "insert a 1\n\
             insert b 2\n\
             insert c 3\n\
             remove b\n\
             findall\n",
        );
        let line = output.trim_end();
        assert!(line.starts_with('[') && line.ends_with(']'), "{output}");
        let keys: HashSet<&str> = line[1..line.len() - 1].split(", ").collect();
        assert_eq!(keys, HashSet::from(["a", "c"]));
    }

    #[test]
    fn findall_on_an_empty_table() {
        let output = session("findall\n");
        assert_eq!(output, "[]\n");
    }

    /// Rejects writes of a specific payload so the per-line error reporting
    /// path can be exercised.
    struct JammedWriter {
        wrote: Vec<u8>,
    }

    impl Write for JammedWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if buf.starts_with(b"boom") {
                return Err(io::Error::other("output jammed"));
            }
            self.wrote.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn a_failing_command_does_not_end_the_session() {
        let script = "insert k boom\n\
                      lookup k\n\
                      insert a 1\n\
                      lookup a\n";
        let mut table = HashTable::new();
        let mut output = JammedWriter { wrote: Vec::new() };
        run(&mut table, script.as_bytes(), &mut output, Cost::LogN).unwrap();

        let output = String::from_utf8(output.wrote).unwrap();
        assert_eq!(
            output,
            "Error processing command: lookup k - output jammed\n1\n"
        );
    }
}
