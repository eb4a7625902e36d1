//! 원시 값 파서 — 정수, 크기, key-value 분리
//!
//! 공유 상태가 없는 순수 함수들입니다. 실패는 `None`으로 표현하고,
//! 그룹/키 문맥을 담은 에러 변환은 호출자(로더)가 담당합니다.

/// key-value 분리 시 키의 최대 길이
pub const MAX_KEY_LEN: usize = 64;

/// key-value 분리 시 값의 최대 길이
pub const MAX_VALUE_LEN: usize = 1024;

/// 베이스 접두어를 인식하는 정수 파서
///
/// C `strtol(s, &end, 0)` 규약을 따릅니다:
/// - 선행 ASCII 공백 허용, 부호(`+`/`-`) 허용
/// - `0x`/`0X` 접두어는 16진수, 그 외 선행 `0`은 8진수, 나머지는 10진수
/// - 빈 문자열, 숫자 뒤의 잔여 문자, 오버플로우는 실패
pub fn parse_int(s: &str) -> Option<i64> {
    let s = s.trim_start_matches(|c: char| c.is_ascii_whitespace());
    if s.is_empty() {
        return None;
    }

    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    let (radix, digits) = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        (16, hex)
    } else if digits.len() > 1 && digits.starts_with('0') {
        (8, &digits[1..])
    } else {
        (10, digits)
    };

    if digits.is_empty() {
        return None;
    }

    let magnitude = i64::from_str_radix(digits, radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// `K`/`KB` (×1024), `M`/`MB` (×1024²) 접미어를 허용하는 크기 파서
///
/// 접미어는 대소문자를 구분하지 않습니다. K/KB 제거를 먼저 시도하고,
/// 그 결과에 대해 M/MB 제거를 다시 시도합니다. 두 접미어가 겹쳐 있으면
/// 나중에 제거된 M/MB의 배수가 적용됩니다 (`4MK` → 4 MiB).
/// 곱셈은 포화 연산입니다. 범위 클램핑은 저장 단계에서 수행됩니다.
pub fn parse_size(s: &str) -> Option<i64> {
    let mut rest = s;
    let mut multiplier: i64 = 1;

    if let Some(t) = trim_suffix_ci(rest, "K").or_else(|| trim_suffix_ci(rest, "KB")) {
        rest = t;
        multiplier = 1024;
    }

    if let Some(t) = trim_suffix_ci(rest, "M").or_else(|| trim_suffix_ci(rest, "MB")) {
        rest = t;
        multiplier = 1024 * 1024;
    }

    let n = parse_int(rest)?;
    Some(n.saturating_mul(multiplier))
}

/// 대소문자 무시 접미어 제거
///
/// 접미어가 일치하면 제거된 나머지를, 아니면 `None`을 반환합니다.
fn trim_suffix_ci<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    if s.len() < suffix.len() {
        return None;
    }
    let (head, tail) = s.split_at(s.len() - suffix.len());
    if tail.eq_ignore_ascii_case(suffix) {
        Some(head)
    } else {
        None
    }
}

/// `KEY=VALUE` 형태의 문자열을 키와 값으로 분리합니다.
///
/// 첫 번째 `=`에서 분리합니다. `=`가 없거나, 키가 비어 있거나,
/// 키/값이 [`MAX_KEY_LEN`]/[`MAX_VALUE_LEN`]을 초과하면 실패합니다.
/// 값은 비어 있을 수 있습니다.
pub fn split_key_value(s: &str) -> Option<(&str, &str)> {
    let idx = s.find('=')?;
    if idx == 0 {
        return None;
    }

    let key = &s[..idx];
    let value = &s[idx + 1..];
    if key.len() > MAX_KEY_LEN || value.len() > MAX_VALUE_LEN {
        return None;
    }

    Some((key, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_decimal() {
        assert_eq!(parse_int("0"), Some(0));
        assert_eq!(parse_int("42"), Some(42));
        assert_eq!(parse_int("-42"), Some(-42));
        assert_eq!(parse_int("+7"), Some(7));
    }

    #[test]
    fn int_hex_prefix() {
        assert_eq!(parse_int("0x10"), Some(16));
        assert_eq!(parse_int("0XfF"), Some(255));
        assert_eq!(parse_int("-0x10"), Some(-16));
    }

    #[test]
    fn int_octal_prefix() {
        assert_eq!(parse_int("010"), Some(8));
        assert_eq!(parse_int("0755"), Some(493));
    }

    #[test]
    fn int_leading_whitespace_allowed() {
        assert_eq!(parse_int("  42"), Some(42));
    }

    #[test]
    fn int_rejects_empty_and_garbage() {
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("abc"), None);
        assert_eq!(parse_int("42x"), None);
        assert_eq!(parse_int("4 2"), None);
        assert_eq!(parse_int("0x"), None);
        assert_eq!(parse_int("08"), None); // 8진수에 8은 없음
        assert_eq!(parse_int("-"), None);
    }

    #[test]
    fn int_rejects_overflow() {
        assert_eq!(parse_int("99999999999999999999999999"), None);
    }

    #[test]
    fn size_plain_number_has_no_multiplier() {
        assert_eq!(parse_size("4096"), Some(4096));
    }

    #[test]
    fn size_kilobyte_suffixes() {
        assert_eq!(parse_size("4K"), Some(4096));
        assert_eq!(parse_size("4KB"), Some(4096));
        assert_eq!(parse_size("4k"), Some(4096));
        assert_eq!(parse_size("4kb"), Some(4096));
    }

    #[test]
    fn size_megabyte_suffixes() {
        assert_eq!(parse_size("2M"), Some(2 * 1024 * 1024));
        assert_eq!(parse_size("2MB"), Some(2 * 1024 * 1024));
        assert_eq!(parse_size("2mb"), Some(2 * 1024 * 1024));
    }

    #[test]
    fn size_stacked_suffixes_resolve_to_later_trim() {
        // K 제거 후 남은 M이 다시 제거되어 M 배수가 적용됨
        assert_eq!(parse_size("4MK"), Some(4 * 1024 * 1024));
    }

    #[test]
    fn size_rejects_garbage() {
        assert_eq!(parse_size("abc"), None);
        assert_eq!(parse_size("K"), None);
        assert_eq!(parse_size(""), None);
        assert_eq!(parse_size("4KBM"), None);
    }

    #[test]
    fn size_hex_with_suffix() {
        assert_eq!(parse_size("0x10K"), Some(16 * 1024));
    }

    #[test]
    fn key_value_basic() {
        assert_eq!(split_key_value("File=/var/log/a"), Some(("File", "/var/log/a")));
    }

    #[test]
    fn key_value_splits_on_first_equals() {
        assert_eq!(split_key_value("a=b=c"), Some(("a", "b=c")));
    }

    #[test]
    fn key_value_empty_value_allowed() {
        assert_eq!(split_key_value("Key="), Some(("Key", "")));
    }

    #[test]
    fn key_value_rejects_missing_equals_and_empty_key() {
        assert_eq!(split_key_value("no separator"), None);
        assert_eq!(split_key_value("=value"), None);
        assert_eq!(split_key_value(""), None);
    }

    #[test]
    fn key_value_rejects_oversized_halves() {
        let long_key = format!("{}=v", "k".repeat(MAX_KEY_LEN + 1));
        assert_eq!(split_key_value(&long_key), None);

        let long_value = format!("k={}", "v".repeat(MAX_VALUE_LEN + 1));
        assert_eq!(split_key_value(&long_value), None);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn parse_int_never_panics(s in "\\PC*") {
                let _ = parse_int(&s);
            }

            #[test]
            fn parse_size_never_panics(s in "\\PC*") {
                let _ = parse_size(&s);
            }

            #[test]
            fn decimal_roundtrip(n in -1_000_000_000i64..1_000_000_000) {
                prop_assert_eq!(parse_int(&n.to_string()), Some(n));
            }

            #[test]
            fn size_kb_is_1024x(n in 0i64..1_000_000) {
                prop_assert_eq!(parse_size(&format!("{n}K")), Some(n * 1024));
                prop_assert_eq!(parse_size(&format!("{n}KB")), Some(n * 1024));
            }

            #[test]
            fn split_key_value_never_panics(s in "\\PC*") {
                let _ = split_key_value(&s);
            }
        }
    }
}
