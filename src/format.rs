// Copyright 2022 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// Fixed point with thousands separators, eg: `1,234.50`.
pub fn thousands(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let digits = format!("{:.*}", decimals, value.abs());
    let (whole, fraction) = match digits.find('.') {
        Some(dot) => digits.split_at(dot),
        None => (digits.as_str(), ""),
    };
    let sign = if value < 0.0 { "-" } else { "" };

    format!("{}{}{}", sign, group(whole), fraction)
}

/// Integer with thousands separators, eg: `1,234,567`.
pub fn thousands_int(value: u64) -> String {
    group(&value.to_string())
}

fn group(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
