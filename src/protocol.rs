// src/protocol.rs

//! # Wire Protocol Codec
//!
//! Decodes a raw request into argument tokens and encodes typed results back
//! into RESP reply bytes.
//!
//! Requests arrive in one of two forms:
//! - RESP array of bulk strings: `*2\r\n$4\r\nPING\r\n$4\r\nTEST\r\n`
//! - plain text, split on ASCII whitespace: `SET foo bar`
//!
//! Decoding never fails hard. A malformed RESP frame yields whatever tokens
//! were parsed before the malformation (possibly none); the dispatcher treats
//! an empty token list as an empty command.

/// Decode a raw request into argument tokens.
///
/// Input not starting with `*` falls back to whitespace splitting. For RESP
/// input, parsing stops at the first malformed header, non-integer length, or
/// length that would read past the end of the buffer, and returns the tokens
/// collected so far.
pub fn parse(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    if input.is_empty() {
        return tokens;
    }
    let bytes = input.as_bytes();
    if bytes[0] != b'*' {
        return input.split_whitespace().map(str::to_string).collect();
    }

    // "*<N>\r\n"
    let mut pos = 1usize;
    let Some(crlf) = find_crlf(bytes, pos) else {
        return tokens;
    };
    let Some(count) = parse_int(&bytes[pos..crlf]) else {
        return tokens;
    };
    pos = crlf + 2;

    for _ in 0..count {
        // "$<len>\r\n<len bytes>\r\n"
        if pos >= bytes.len() || bytes[pos] != b'$' {
            break;
        }
        pos += 1;
        let Some(crlf) = find_crlf(bytes, pos) else {
            break;
        };
        let Some(len) = parse_int(&bytes[pos..crlf]) else {
            break;
        };
        pos = crlf + 2;
        // len 来自外部输入，可能大到让 pos + len 溢出
        if len > bytes.len() - pos {
            break;
        }
        tokens.push(String::from_utf8_lossy(&bytes[pos..pos + len]).into_owned());
        pos += len + 2; // payload + CRLF
    }
    tokens
}

fn find_crlf(bytes: &[u8], from: usize) -> Option<usize> {
    if from >= bytes.len() {
        return None;
    }
    bytes[from..]
        .windows(2)
        .position(|w| w == b"\r\n")
        .map(|i| i + from)
}

fn parse_int(bytes: &[u8]) -> Option<usize> {
    std::str::from_utf8(bytes).ok()?.parse().ok()
}

/// 一条命令的回复。五种形态，编码规则与产生它的命令无关。
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// `+text\r\n`
    Simple(String),
    /// `-ERR text\r\n`（"ERR " 前缀由编码器补上）
    Error(String),
    /// `:n\r\n`
    Integer(i64),
    /// `$len\r\nbytes\r\n`，None 编码为 `$-1\r\n`
    Bulk(Option<String>),
    /// `*count\r\n` 后跟 count 个 bulk string
    Array(Vec<String>),
}

impl Reply {
    pub fn encode(&self) -> String {
        match self {
            Reply::Simple(text) => format!("+{}\r\n", text),
            Reply::Error(msg) => format!("-ERR {}\r\n", msg),
            Reply::Integer(n) => format!(":{}\r\n", n),
            Reply::Bulk(Some(val)) => format!("${}\r\n{}\r\n", val.len(), val),
            Reply::Bulk(None) => "$-1\r\n".to_string(),
            Reply::Array(items) => {
                let mut out = format!("*{}\r\n", items.len());
                for item in items {
                    out.push_str(&format!("${}\r\n{}\r\n", item.len(), item));
                }
                out
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resp_array() {
        let tokens = parse("*3\r\n$3\r\nSET\r\n$3\r\nfoo\r\n$3\r\nbar\r\n");
        assert_eq!(tokens, vec!["SET", "foo", "bar"]);
    }

    #[test]
    fn test_parse_plain_text() {
        assert_eq!(parse("SET foo bar"), vec!["SET", "foo", "bar"]);
        assert_eq!(parse("  PING \r\n"), vec!["PING"]);
        assert_eq!(parse(""), Vec::<String>::new());
    }

    #[test]
    fn test_parse_empty_payload_element() {
        let tokens = parse("*2\r\n$4\r\nECHO\r\n$0\r\n\r\n");
        assert_eq!(tokens, vec!["ECHO", ""]);
    }

    #[test]
    fn test_parse_malformed_header_returns_partial() {
        // 头部数字坏掉：直接空结果
        assert_eq!(parse("*x\r\n$4\r\nPING\r\n"), Vec::<String>::new());
        // 缺 CRLF
        assert_eq!(parse("*2"), Vec::<String>::new());
        // 第二个元素长度越界：保留第一个
        assert_eq!(parse("*2\r\n$3\r\nGET\r\n$99\r\nfoo\r\n"), vec!["GET"]);
        // 元素不以 '$' 开头
        assert_eq!(parse("*2\r\n$3\r\nGET\r\n:1\r\n"), vec!["GET"]);
        // 负数长度不是合法长度
        assert_eq!(parse("*1\r\n$-1\r\n"), Vec::<String>::new());
    }

    #[test]
    fn test_parse_huge_declared_length() {
        // 声称的长度接近 usize::MAX：按越界处理，不得 panic
        assert_eq!(
            parse("*1\r\n$18446744073709551615\r\n"),
            Vec::<String>::new()
        );
        assert_eq!(
            parse("*2\r\n$4\r\nECHO\r\n$18446744073709551615\r\nx\r\n"),
            vec!["ECHO"]
        );
    }

    #[test]
    fn test_parse_declares_more_elements_than_present() {
        assert_eq!(parse("*3\r\n$4\r\nPING\r\n"), vec!["PING"]);
    }

    #[test]
    fn test_encode_shapes() {
        assert_eq!(Reply::Simple("OK".into()).encode(), "+OK\r\n");
        assert_eq!(Reply::Error("Unknown command".into()).encode(), "-ERR Unknown command\r\n");
        assert_eq!(Reply::Integer(42).encode(), ":42\r\n");
        assert_eq!(Reply::Bulk(Some("bar".into())).encode(), "$3\r\nbar\r\n");
        assert_eq!(Reply::Bulk(None).encode(), "$-1\r\n");
        assert_eq!(
            Reply::Array(vec!["a".into(), "bc".into()]).encode(),
            "*2\r\n$1\r\na\r\n$2\r\nbc\r\n"
        );
        assert_eq!(Reply::Array(vec![]).encode(), "*0\r\n");
    }

    #[test]
    fn test_bulk_length_is_byte_length() {
        // 多字节 UTF-8：长度按字节算
        let encoded = Reply::Bulk(Some("héllo".into())).encode();
        assert_eq!(encoded, "$6\r\nhéllo\r\n");
        let tokens = parse("*1\r\n$6\r\nhéllo\r\n");
        assert_eq!(tokens, vec!["héllo"]);
    }
}
