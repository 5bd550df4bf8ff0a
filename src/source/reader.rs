use std::io::Read;

use anyhow::Context;
use serde_json::{StreamDeserializer, Value, de::IoRead};

use super::types::RawRecord;

/// Lazily reads raw records from JSON text.
///
/// Accepts a top-level array, a single object, or any whitespace-separated
/// sequence of those (JSON lines included). Items are yielded one at a time;
/// only the array currently being drained is held in memory.
pub struct RecordReader<R: Read> {
    values: StreamDeserializer<'static, IoRead<R>, Value>,
    pending: std::vec::IntoIter<Value>,
    index: usize,
    done: bool,
}

pub fn read_records<R: Read>(reader: R) -> RecordReader<R> {
    RecordReader {
        values: serde_json::Deserializer::from_reader(reader).into_iter::<Value>(),
        pending: Vec::new().into_iter(),
        index: 0,
        done: false,
    }
}

impl<R: Read> RecordReader<R> {
    fn decode(&mut self, value: Value) -> anyhow::Result<RawRecord> {
        let index = self.index;
        self.index += 1;
        serde_json::from_value(value)
            .with_context(|| format!("record #{index} is not a DNS record"))
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = anyhow::Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(value) = self.pending.next() {
                return Some(self.decode(value));
            }
            if self.done {
                return None;
            }

            match self.values.next()? {
                Ok(Value::Array(items)) => self.pending = items.into_iter(),
                Ok(value) => return Some(self.decode(value)),
                Err(err) => {
                    self.done = true;
                    let (line, column) = (err.line(), err.column());
                    let context = format!("invalid JSON at line {line} column {column}");
                    return Some(Err(err).context(context));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host_names(input: &str) -> Vec<Option<String>> {
        read_records(input.as_bytes())
            .map(|r| r.unwrap().host_name)
            .collect()
    }

    #[test]
    fn reads_top_level_array() {
        let input = r#"[{"HostName":"a"},{"HostName":"b"}]"#;
        assert_eq!(host_names(input), vec![Some("a".into()), Some("b".into())]);
    }

    #[test]
    fn reads_json_lines_and_single_objects() {
        let input = "{\"hostName\":\"a\"}\n{\"hostName\":\"b\"}\n[{\"hostName\":\"c\"}]\n";
        assert_eq!(
            host_names(input),
            vec![Some("a".into()), Some("b".into()), Some("c".into())]
        );
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(host_names("  \n").is_empty());
        assert!(host_names("[]").is_empty());
    }

    #[test]
    fn stops_after_syntax_error() {
        let mut records = read_records("{\"HostName\":\"a\"}\n{\"HostName\": }".as_bytes());
        assert!(records.next().unwrap().is_ok());
        let err = records.next().unwrap().unwrap_err();
        assert!(err.to_string().starts_with("invalid JSON at line 2 column "), "{err}");
        assert!(records.next().is_none());
    }

    #[test]
    fn non_record_value_is_reported_with_index() {
        let mut records = read_records(r#"[{"HostName":"a"}, 42]"#.as_bytes());
        assert!(records.next().unwrap().is_ok());
        let err = records.next().unwrap().unwrap_err();
        assert_eq!(err.to_string(), "record #1 is not a DNS record");
    }
}
