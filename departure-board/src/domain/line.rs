//! Line-name normalization.
//!
//! The feed publishes line names like `"Straßenbahn 3"`, `"Bus SEV 3"` or
//! `"Zug InterCityExpress"`. Displays want the short line code (`"3"`,
//! `"SEV3"`, `"ICE"` + train number). The rules below reproduce the naming
//! conventions observed in the feed; they are a fixed mapping table, checked
//! in order with first match winning.

/// Normalize a published line name into the short code shown on displays.
///
/// Rules, first match wins:
/// 1. second token is `SEV` (rail-replacement bus) → `SEV` + last token
/// 2. last token is `InterCityExpress` → `ICE` + second token
/// 3. last token is `InterCity` → `IC` + second token
/// 4. last token is `Flixbus` → `FLX` + last token
/// 5. otherwise the last whitespace-delimited token
///
/// Inputs with fewer than two tokens fall through to rule 5; a single-token
/// or empty input is returned unchanged.
///
/// # Examples
///
/// ```
/// use departure_board::domain::normalize_line_name;
///
/// assert_eq!(normalize_line_name("Straßenbahn 3"), "3");
/// assert_eq!(normalize_line_name("Bus SEV 3"), "SEV3");
/// assert_eq!(normalize_line_name("Zug 273 InterCityExpress"), "ICE273");
/// ```
pub fn normalize_line_name(published: &str) -> String {
    let tokens: Vec<&str> = published.split_whitespace().collect();

    let Some(&last) = tokens.last() else {
        // Empty or all-whitespace input.
        return published.to_string();
    };

    if tokens.len() >= 2 {
        let second = tokens[1];
        if second == "SEV" {
            return format!("SEV{last}");
        }
        if last == "InterCityExpress" {
            return format!("ICE{second}");
        }
        if last == "InterCity" {
            return format!("IC{second}");
        }
    }

    if last == "Flixbus" {
        return format!("FLX{last}");
    }

    last.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_line_number() {
        assert_eq!(normalize_line_name("Straßenbahn 3"), "3");
        assert_eq!(normalize_line_name("Bus 47"), "47");
        assert_eq!(normalize_line_name("Linie S1"), "S1");
    }

    #[test]
    fn replacement_service() {
        assert_eq!(normalize_line_name("Bus SEV 3"), "SEV3");
        assert_eq!(normalize_line_name("Linie SEV S31"), "SEVS31");
    }

    #[test]
    fn sev_marker_must_be_second_token() {
        // SEV elsewhere does not trigger the replacement rule
        assert_eq!(normalize_line_name("Bus Ersatz SEV"), "SEV");
    }

    #[test]
    fn intercity_express() {
        assert_eq!(normalize_line_name("Zug 273 InterCityExpress"), "ICE273");
    }

    #[test]
    fn intercity() {
        assert_eq!(normalize_line_name("Zug 2060 InterCity"), "IC2060");
    }

    #[test]
    fn flixbus() {
        assert_eq!(normalize_line_name("Fernbus Flixbus"), "FLXFlixbus");
    }

    #[test]
    fn single_token_returned_unchanged() {
        assert_eq!(normalize_line_name("3"), "3");
        assert_eq!(normalize_line_name("InterCity"), "InterCity");
    }

    #[test]
    fn empty_input_does_not_panic() {
        assert_eq!(normalize_line_name(""), "");
        assert_eq!(normalize_line_name("   "), "   ");
    }

    #[test]
    fn extra_whitespace_ignored() {
        assert_eq!(normalize_line_name("  Bus   SEV   3  "), "SEV3");
    }
}
