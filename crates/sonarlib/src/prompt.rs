use std::io::{BufRead, Write};

use crate::resources::ResourceKind;

/// Asks whether a single resource may be deleted.
pub trait Confirm {
    fn confirm(&mut self, kind: ResourceKind, name: &str) -> bool;
}

/// An interactive yes/no prompt.  Unrecognised answers are asked again; end
/// of input, or failing to write the question, counts as "no".
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl Prompt<std::io::StdinLock<'static>, std::io::Stdout> {
    /// Prompt on the terminal.
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> Confirm for Prompt<R, W> {
    fn confirm(&mut self, kind: ResourceKind, name: &str) -> bool {
        loop {
            let asked = write!(self.output, "delete {kind} \"{name}\" [y/n]? ")
                .and_then(|()| self.output.flush());
            if let Err(error) = asked {
                tracing::warn!(%kind, name, ?error, "could not ask for confirmation, not deleting");
                return false;
            }

            let mut response = String::new();
            match self.input.read_line(&mut response) {
                Ok(0) => {
                    tracing::warn!(%kind, name, "no response, not deleting");
                    return false;
                }
                Ok(_) => (),
                Err(error) => {
                    tracing::warn!(%kind, name, ?error, "could not read response, not deleting");
                    return false;
                }
            }

            match response.trim().to_lowercase().as_str() {
                "y" | "yes" => return true,
                "n" | "no" => {
                    tracing::info!(%kind, name, "not deleting");
                    return false;
                }
                _ => {
                    if let Err(error) =
                        writeln!(self.output, "unknown response, please use 'y' or 'n':")
                    {
                        tracing::warn!(%kind, name, ?error, "could not ask for confirmation, not deleting");
                        return false;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ask(input: &str) -> (bool, String) {
        let mut output = Vec::new();
        let answer = Prompt::new(input.as_bytes(), &mut output)
            .confirm(ResourceKind::Deployment, "debug/sonar-test");
        (answer, String::from_utf8(output).unwrap())
    }

    #[test]
    fn accepts_yes() {
        for input in ["y\n", "yes\n", "Y\n", "YES\n", "  yes  \n"] {
            let (answer, output) = ask(input);
            assert!(answer, "{input:?}");
            assert_eq!(output, "delete deployment \"debug/sonar-test\" [y/n]? ");
        }
    }

    #[test]
    fn accepts_no() {
        for input in ["n\n", "no\n", "No\n"] {
            assert!(!ask(input).0, "{input:?}");
        }
    }

    #[test]
    fn asks_again_on_unknown_response() {
        let (answer, output) = ask("maybe\n\ny\n");
        assert!(answer);
        assert_eq!(output.matches("[y/n]? ").count(), 3);
        assert_eq!(output.matches("unknown response").count(), 2);
    }

    /// Output which has gone away, eg a closed pipe.
    struct Closed;

    impl Write for Closed {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }
    }

    #[test]
    fn unwritable_output_is_no() {
        let mut input = "y\n".as_bytes();
        let answer =
            Prompt::new(&mut input, Closed).confirm(ResourceKind::Deployment, "debug/sonar-test");

        assert!(!answer);
        // the answer was never read
        assert_eq!(input, b"y\n");
    }

    #[test]
    fn end_of_input_is_no() {
        assert!(!ask("").0);
        assert!(!ask("what\n").0);
    }
}
