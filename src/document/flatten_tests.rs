//! Tests for document flattening.

use super::flatten;
use serde_json::json;

fn keys(flat: &super::FlatMap) -> Vec<&str> {
    flat.keys().map(String::as_str).collect()
}

mod maps {
    use super::*;

    #[test]
    fn nested_maps_compose_dotted_keys() {
        let flat = flatten(&json!({"a": {"b": "1", "c": "2"}}));

        assert_eq!(flat.len(), 2);
        assert_eq!(flat["a.b"], "1");
        assert_eq!(flat["a.c"], "2");
    }

    #[test]
    fn root_keys_have_no_prefix() {
        let flat = flatten(&json!({"name": "orders"}));

        assert_eq!(keys(&flat), vec!["name"]);
    }

    #[test]
    fn deep_nesting_keeps_every_segment() {
        let flat = flatten(&json!({"a": {"b": {"c": {"d": {"e": "deep"}}}}}));

        assert_eq!(flat["a.b.c.d.e"], "deep");
    }

    #[test]
    fn empty_nested_map_produces_no_keys() {
        let flat = flatten(&json!({"a": {}, "b": "x"}));

        assert_eq!(keys(&flat), vec!["b"]);
    }
}

mod lists {
    use super::*;

    #[test]
    fn list_elements_use_bracket_indices() {
        let flat = flatten(&json!({"a": ["x", "y"]}));

        assert_eq!(flat.len(), 2);
        assert_eq!(flat["a[0]"], "x");
        assert_eq!(flat["a[1]"], "y");
    }

    #[test]
    fn list_of_maps_produces_indexed_fields() {
        let flat = flatten(&json!({"servers": [{"host": "a", "port": 1}, {"host": "b"}]}));

        assert_eq!(
            keys(&flat),
            vec!["servers[0].host", "servers[0].port", "servers[1].host"]
        );
    }

    #[test]
    fn nested_lists_stack_indices() {
        let flat = flatten(&json!({"grid": [[1, 2], [3]]}));

        assert_eq!(flat["grid[0][0]"], "1");
        assert_eq!(flat["grid[0][1]"], "2");
        assert_eq!(flat["grid[1][0]"], "3");
    }

    #[test]
    fn root_list_has_bare_indices() {
        let flat = flatten(&json!(["first", "second"]));

        assert_eq!(keys(&flat), vec!["[0]", "[1]"]);
    }
}

mod scalars {
    use super::*;

    #[test]
    fn scalars_are_stringified() {
        let flat = flatten(&json!({"int": 8080, "float": 1.5, "yes": true, "no": false}));

        assert_eq!(flat["int"], "8080");
        assert_eq!(flat["float"], "1.5");
        assert_eq!(flat["yes"], "true");
        assert_eq!(flat["no"], "false");
    }

    #[test]
    fn null_becomes_empty_string() {
        let flat = flatten(&json!({"missing": null, "list": [null]}));

        assert_eq!(flat["missing"], "");
        assert_eq!(flat["list[0]"], "");
    }

    #[test]
    fn strings_are_not_quoted() {
        let flat = flatten(&json!({"greeting": "hello \"world\""}));

        assert_eq!(flat["greeting"], "hello \"world\"");
    }
}

mod edge_cases {
    use super::*;

    #[test]
    fn null_root_is_empty() {
        assert!(flatten(&json!(null)).is_empty());
    }

    #[test]
    fn scalar_root_is_empty() {
        assert!(flatten(&json!("just a string")).is_empty());
    }

    #[test]
    fn empty_object_is_empty() {
        assert!(flatten(&json!({})).is_empty());
    }

    #[test]
    fn preserves_document_order() {
        let doc: serde_json::Value =
            serde_yaml::from_str("zeta: 1\nalpha:\n  second: 2\n  first: 3\nmid: [4]\n").unwrap();

        let flat = flatten(&doc);

        assert_eq!(
            keys(&flat),
            vec!["zeta", "alpha.second", "alpha.first", "mid[0]"]
        );
    }

    #[test]
    fn map_keys_without_lists_survive_flattening() {
        let flat = flatten(&json!({"a": {"b": "1", "c": {"d": "2"}}, "e": "3"}));

        let mut names: Vec<&str> = keys(&flat);
        names.sort_unstable();
        assert_eq!(names, vec!["a.b", "a.c.d", "e"]);
    }
}
