/// Builds a [`PropertyMap`](crate::PropertyMap) from identifier/value-list
/// pairs, keeping their order.
///
/// ```rust
/// use sgf_format::props;
///
/// let data = props! { "B" => ["aa"], "AB" => ["cc", "dd:ee"] };
/// assert_eq!(data.first("B"), Some("aa"));
/// assert_eq!(data.get("AB").unwrap().len(), 2);
/// assert!(props! {}.is_empty());
/// ```
#[macro_export]
macro_rules! props {
    // Handle empty map
    {} => {
        $crate::PropertyMap::new()
    };

    // Handle identifier => [values] entries
    { $($key:expr => [ $($value:expr),* $(,)? ]),+ $(,)? } => {{
        let mut map = $crate::PropertyMap::new();
        $(
            map.insert($key, vec![$(::std::string::String::from($value)),*]);
        )+
        map
    }};
}
