//! Row filters shared by the transaction listing and the dashboard queries.

use rusqlite::types::Value;

use crate::month::MonthDayRange;

/// Selects transactions by month of sale and free-text search.
///
/// An empty filter selects every transaction.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TransactionFilter {
    month: Option<MonthDayRange>,
    search: Option<String>,
}

impl TransactionFilter {
    /// A filter that selects transactions sold within `month`, any year.
    pub fn month(month: Option<MonthDayRange>) -> Self {
        Self {
            month,
            search: None,
        }
    }

    /// Also require that the title or description contains `search`
    /// (ignoring ASCII case), or that the price equals `search` read as a
    /// number. Blank search text is ignored.
    pub fn search(mut self, search: Option<&str>) -> Self {
        self.search = search
            .filter(|text| !text.is_empty())
            .map(|text| text.to_owned());
        self
    }

    /// Build the SQL `WHERE` clause and its positional parameters.
    ///
    /// Returns an empty clause when the filter selects every row.
    pub(crate) fn where_clause(&self) -> (String, Vec<Value>) {
        let mut conditions = Vec::new();
        let mut params = Vec::new();

        if let Some(month) = &self.month {
            let (start, end) = month.sql_bounds();
            conditions.push(
                "strftime('%m-%d %H:%M:%f', date_of_sale) BETWEEN ? AND ?".to_owned(),
            );
            params.push(Value::Text(start));
            params.push(Value::Text(end));
        }

        if let Some(search) = &self.search {
            let pattern = format!("%{}%", escape_like_pattern(search));
            let mut search_conditions = vec![
                "product_title LIKE ? ESCAPE '\\'",
                "description LIKE ? ESCAPE '\\'",
            ];
            params.push(Value::Text(pattern.clone()));
            params.push(Value::Text(pattern));

            if let Some(price) = parse_price(search) {
                search_conditions.push("price = ?");
                params.push(Value::Real(price));
            }

            conditions.push(format!("({})", search_conditions.join(" OR ")));
        }

        if conditions.is_empty() {
            (String::new(), params)
        } else {
            (format!("WHERE {}", conditions.join(" AND ")), params)
        }
    }
}

/// Read the number at the start of the search text as a price, so "12 inch"
/// reads as 12. Leading whitespace is skipped. Text that does not start with
/// a finite number has no price match.
fn parse_price(search: &str) -> Option<f64> {
    let text = search.trim_start();
    let bytes = text.as_bytes();
    let count_digits = |from: usize| {
        bytes
            .iter()
            .skip(from)
            .take_while(|byte| byte.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let integer_digits = count_digits(end);
    end += integer_digits;

    let fraction_digits = if bytes.get(end) == Some(&b'.') {
        count_digits(end + 1)
    } else {
        0
    };
    if integer_digits == 0 && fraction_digits == 0 {
        return None;
    }
    if fraction_digits > 0 {
        end += 1 + fraction_digits;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let exponent_sign = matches!(bytes.get(end + 1), Some(b'+' | b'-'));
        let exponent_start = end + 1 + usize::from(exponent_sign);
        let exponent_digits = count_digits(exponent_start);

        if exponent_digits > 0 {
            end = exponent_start + exponent_digits;
        }
    }

    text[..end]
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite())
}

fn escape_like_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for character in text.chars() {
        if matches!(character, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(character);
    }

    escaped
}
