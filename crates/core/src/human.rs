/// Format a sales figure (millions of units) the way tiles and tooltips show it.
pub fn sales(value: f64) -> String {
    format!("{}M", value)
}

#[cfg(test)]
mod tests {
    use super::sales;

    #[test]
    fn formats_shortest_decimal() {
        assert_eq!(sales(30.26), "30.26M");
        assert_eq!(sales(40.0), "40M");
        assert_eq!(sales(0.5), "0.5M");
    }
}
