use std::collections::HashMap;

pub fn builtin_parties() -> HashMap<&'static str, &'static str> {
    HashMap::from([("starter", include_str!("../content/parties/starter.yaml"))])
}

pub fn builtin_bestiaries() -> HashMap<&'static str, &'static str> {
    HashMap::from([("basic", include_str!("../content/bestiary/basic.yaml"))])
}
