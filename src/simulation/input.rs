/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{error, info, warn};
use std::io::BufRead;
use std::sync::Arc;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::coordinator::Building;
use crate::error::InputError;
use crate::shared::PickupRequest;

/***************************************/
/*               Enums                 */
/***************************************/
#[derive(Debug, PartialEq)]
pub enum Command {
    Request(PickupRequest),
    Quit,
    Nothing,
}

/***************************************/
/*             Public API              */
/***************************************/

/// Parses `<origin> <destination> <people>` into a highlighted request, or `q` into `Quit`.
pub fn parse_line(line: &str) -> Result<Command, InputError> {
    let fields: Vec<&str> = line.split_whitespace().collect();

    match fields.as_slice() {
        [] => Ok(Command::Nothing),
        [quit] if quit.eq_ignore_ascii_case("q") => Ok(Command::Quit),
        [origin, destination, people] => {
            let origin = parse_number(origin, "origin floor")?;
            let destination = parse_number(destination, "destination floor")?;
            let people = parse_number(people, "number of people")?;
            Ok(Command::Request(PickupRequest::new(origin, destination, people, true)?))
        }
        _ => Err(InputError::WrongArity { count: fields.len() }),
    }
}

/**
 * Reads requests from stdin and queues them on `building`.
 *
 * Bad lines are logged and skipped. A `q` line is forwarded on `quit_tx` and ends the
 * reader, as does end of input.
 */
pub fn run(building: Arc<Building>, quit_tx: cbc::Sender<()>) {
    info!("Enter requests as '<origin> <destination> <people>', or 'q' to quit");

    for line in std::io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to read from stdin: {}", e);
                break;
            }
        };

        match parse_line(&line) {
            Ok(Command::Request(request)) => {
                if let Err(e) = building.request_elevator(request) {
                    warn!("Request rejected: {}", e);
                }
            }
            Ok(Command::Quit) => {
                let _ = quit_tx.send(());
                return;
            }
            Ok(Command::Nothing) => (),
            Err(e) => warn!("{}", e),
        }
    }
    info!("Input closed");
}

fn parse_number<T: std::str::FromStr>(value: &str, field: &'static str) -> Result<T, InputError> {
    value.parse().map_err(|_| InputError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RequestError;

    #[test]
    fn test_parse_request() {
        match parse_line(" -1 4  3 ").unwrap() {
            Command::Request(request) => {
                assert_eq!(request.origin(), -1);
                assert_eq!(request.destination(), 4);
                assert_eq!(request.party_size(), 3);
                assert!(request.highlight());
            }
            other => panic!("Expected a request, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_quit_and_blank() {
        assert_eq!(parse_line("Q"), Ok(Command::Quit));
        assert_eq!(parse_line("q"), Ok(Command::Quit));
        assert_eq!(parse_line("   "), Ok(Command::Nothing));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_line("1 2"), Err(InputError::WrongArity { count: 2 }));
        assert_eq!(
            parse_line("1 x 2"),
            Err(InputError::InvalidNumber {
                field: "destination floor",
                value: "x".to_string()
            })
        );
        assert_eq!(
            parse_line("1 2 -3"),
            Err(InputError::InvalidNumber {
                field: "number of people",
                value: "-3".to_string()
            })
        );
        assert_eq!(parse_line("1 2 0"), Err(InputError::Request(RequestError::EmptyParty)));
        assert_eq!(
            parse_line("2 2 1"),
            Err(InputError::Request(RequestError::SameFloor { floor: 2 }))
        );
    }
}
