//! 按 JavaScript `Number#toString` 的规则输出数值，保证 SVG 中的数字与浏览器端一致。

/// 写入最短往返表示：整数不带 `.0`，`-0` 输出为 `0`。
pub(crate) fn js_number_to_string(mut v: f64, buf: &mut ryu_js::Buffer) -> &str {
    if v.is_nan() {
        return "NaN";
    }
    if v.is_infinite() {
        return if v > 0.0 { "Infinity" } else { "-Infinity" };
    }
    if v == -0.0 {
        v = 0.0;
    }
    buf.format_finite(v)
}

pub(crate) fn push_number(out: &mut String, v: f64, buf: &mut ryu_js::Buffer) {
    out.push_str(js_number_to_string(v, buf));
}

/// 以空格分隔依次写入多个数值。
pub(crate) fn push_numbers(out: &mut String, values: &[f64], buf: &mut ryu_js::Buffer) {
    for (index, value) in values.iter().enumerate() {
        if index > 0 {
            out.push(' ');
        }
        push_number(out, *value, buf);
    }
}

/// `Display` 包装，供 `format!`/`write!` 模板使用。
pub(crate) struct JsNumber(pub f64);

impl std::fmt::Display for JsNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut buf = ryu_js::Buffer::new();
        f.write_str(js_number_to_string(self.0, &mut buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format_number(v: f64) -> String {
        JsNumber(v).to_string()
    }

    #[test]
    fn integers_have_no_fraction() {
        assert_eq!(format_number(3000.0), "3000");
        assert_eq!(format_number(-250.0), "-250");
        assert_eq!(format_number(-0.0), "0");
    }

    #[test]
    fn fractions_use_shortest_form() {
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(1e21), "1e+21");
    }

    #[test]
    fn non_finite_values_follow_javascript() {
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn numbers_are_space_separated() {
        let mut out = String::new();
        let mut buf = ryu_js::Buffer::new();
        push_numbers(&mut out, &[1.0, 2.5, -3.0], &mut buf);
        assert_eq!(out, "1 2.5 -3");
    }
}
