//! Line-oriented parser for iwinfo client snapshots.
//!
//! A snapshot is one header line followed by one whitespace-separated line
//! per associated client:
//!
//! ```text
//! ifname mac rssi snr inactive rx_phy rx_mbytes rx_prr rx_vht_mcs_index ...
//! wlan0 aa:bb:cc:dd:ee:ff -42 30 5 ...
//! ```
//!
//! Lines with the wrong number of tokens are skipped: the source tool may
//! still be writing them. A non-numeric value in a numeric column fails
//! the whole scan.

use super::record::{ClientStat, Field};
use std::io::{BufRead, BufReader, Read};
use std::num::ParseIntError;
use thiserror::Error;

/// Number of tokens on an accepted client line.
pub const EXPECTED_TOKENS: usize = Field::FIRST_COLUMN + Field::COUNT;

/// Errors that abort a snapshot scan.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: invalid {field} value {token:?}: {source}")]
    InvalidNumber {
        /// 1-based line number, counting the header.
        line: usize,
        field: Field,
        token: String,
        #[source]
        source: ParseIntError,
    },

    #[error("failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),
}

/// Reads a snapshot and returns one record per well-formed client line,
/// in input order.
///
/// The first line is discarded without inspection. An empty input or a
/// header with no client lines yields an empty vector.
pub fn scan<R: Read>(reader: R) -> Result<Vec<ClientStat>, ParseError> {
    let mut lines = BufReader::new(reader).split(b'\n');

    // Header.
    if lines.next().transpose()?.is_none() {
        return Ok(Vec::new());
    }

    let mut stats = Vec::new();
    for (n, line) in lines.enumerate() {
        let line = line?;
        if let Some(stat) = parse_line(&String::from_utf8_lossy(&line), n + 2)? {
            stats.push(stat);
        }
    }

    Ok(stats)
}

/// Parses a single client line. Returns `Ok(None)` when the token count
/// does not match [`EXPECTED_TOKENS`].
fn parse_line(line: &str, line_no: usize) -> Result<Option<ClientStat>, ParseError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != EXPECTED_TOKENS {
        return Ok(None);
    }

    let mut values = [0i64; Field::COUNT];
    for field in Field::ALL {
        let token = tokens[field.column()];
        values[field.index()] = token.parse().map_err(|source| ParseError::InvalidNumber {
            line: line_no,
            field,
            token: token.to_string(),
            source,
        })?;
    }

    Ok(Some(ClientStat::from_columns(tokens[0], tokens[1], values)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io;

    const HEADER: &str = "ifname mac rssi snr inactive rx_phy rx_mbytes rx_prr rx_vht_mcs_index \
        rx_vht_mcs_mhz rx_vht_nss rx_packets tx_phy tx_mbytes tx_prr tx_vht_mcs_index \
        tx_vht_mcs_mhz tx_vht_nss tx_packets expected_throughput channel_utilization";

    const LINE: &str = "wlan0 aa:bb:cc:dd:ee:ff -42 30 5 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16";

    /// Reader that yields some bytes and then fails.
    struct FailingReader {
        data: io::Cursor<Vec<u8>>,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.data.read(buf)? {
                0 => Err(io::Error::new(io::ErrorKind::BrokenPipe, "source went away")),
                n => Ok(n),
            }
        }
    }

    #[test]
    fn test_empty_stream() {
        assert!(scan("".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_header_only() {
        assert!(scan(HEADER.as_bytes()).unwrap().is_empty());
        assert!(scan(format!("{HEADER}\n").as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_single_client() {
        let input = format!("{HEADER}\n{LINE}\n");
        let stats = scan(input.as_bytes()).unwrap();

        assert_eq!(stats.len(), 1);
        let s = &stats[0];
        assert_eq!(s.interface, "wlan0");
        assert_eq!(s.client, "aa:bb:cc:dd:ee:ff");
        assert_eq!(s.rssi, -42);
        assert_eq!(s.snr, 30);
        assert_eq!(s.inactive_seconds, 5);
        assert_eq!(s.rx_phy, 1);
        assert_eq!(s.rx_packets, 7);
        assert_eq!(s.tx_phy, 8);
        assert_eq!(s.tx_packets, 14);
        assert_eq!(s.expected_throughput, 15);
        assert_eq!(s.channel_utilization, 16);
    }

    #[test]
    fn test_header_is_never_parsed() {
        // A valid client line in header position is discarded.
        let input = format!("{LINE}\n{LINE}\n");
        assert_eq!(scan(input.as_bytes()).unwrap().len(), 1);
    }

    #[test]
    fn test_crlf_and_missing_final_newline() {
        let input = format!("{HEADER}\r\n{LINE}\r\n{LINE}");
        let stats = scan(input.as_bytes()).unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].channel_utilization, 16);
    }

    #[test]
    fn test_short_lines_are_skipped() {
        let input = format!(
            "{HEADER}\n{LINE}\nwlan1 11:22:33:44:55:66 -60 20 1\n\n{}\n",
            LINE.replace("wlan0", "wlan1")
        );
        let stats = scan(input.as_bytes()).unwrap();

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].interface, "wlan0");
        assert_eq!(stats[1].interface, "wlan1");
    }

    #[test]
    fn test_long_lines_are_skipped() {
        let input = format!("{HEADER}\n{LINE} 17\n");
        assert!(scan(input.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_bad_number_fails_scan() {
        let bad = LINE.replace(" 16", " abc");
        let input = format!("{HEADER}\n{LINE}\n{LINE}\n{bad}\n{LINE}\n");

        match scan(input.as_bytes()) {
            Err(ParseError::InvalidNumber { line, field, token, .. }) => {
                assert_eq!(line, 4);
                assert_eq!(field, Field::ChannelUtilization);
                assert_eq!(token, "abc");
            }
            other => panic!("expected InvalidNumber, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_number_in_short_line_is_ignored() {
        let input = format!("{HEADER}\nwlan0 aa:bb abc\n{LINE}\n");
        assert_eq!(scan(input.as_bytes()).unwrap().len(), 1);
    }

    #[test]
    fn test_identity_is_taken_verbatim() {
        let line = LINE.replace("aa:bb:cc:dd:ee:ff", "not-a-mac");
        let input = format!("{HEADER}\n{line}\n");
        assert_eq!(scan(input.as_bytes()).unwrap()[0].client, "not-a-mac");
    }

    #[test]
    fn test_read_error_discards_records() {
        let reader = FailingReader {
            data: io::Cursor::new(format!("{HEADER}\n{LINE}\n").into_bytes()),
        };
        assert!(matches!(scan(reader), Err(ParseError::Io(_))));
    }

    fn client_line() -> impl Strategy<Value = (String, String, [i64; Field::COUNT])> {
        (
            "[a-z][a-z0-9.-]{0,8}",
            "[0-9a-f]{2}(:[0-9a-f]{2}){5}",
            proptest::array::uniform19(any::<i64>()),
        )
    }

    proptest! {
        #[test]
        fn prop_well_formed_lines_map_positionally(
            clients in proptest::collection::vec(client_line(), 0..8)
        ) {
            let mut input = String::from(HEADER);
            input.push('\n');
            for (iface, mac, values) in &clients {
                let nums: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                input.push_str(&format!("{} {} {}\n", iface, mac, nums.join(" ")));
            }

            let stats = scan(input.as_bytes()).unwrap();
            prop_assert_eq!(stats.len(), clients.len());
            for (stat, (iface, mac, values)) in stats.iter().zip(&clients) {
                prop_assert_eq!(&stat.interface, iface);
                prop_assert_eq!(&stat.client, mac);
                for field in Field::ALL {
                    prop_assert_eq!(stat.get(field), values[field.index()]);
                }
            }

            // Scanning is repeatable.
            prop_assert_eq!(scan(input.as_bytes()).unwrap(), stats);
        }

        #[test]
        fn prop_wrong_arity_is_skipped(
            tokens in proptest::collection::vec("[a-z0-9]{1,4}", 0..40)
        ) {
            prop_assume!(tokens.len() != EXPECTED_TOKENS);
            let input = format!("{HEADER}\n{}\n{LINE}\n", tokens.join(" "));
            prop_assert_eq!(scan(input.as_bytes()).unwrap().len(), 1);
        }
    }
}
