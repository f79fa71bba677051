#[cfg(test)]
pub mod test {
    use crate::rules::{MatchType, Rule, RuleCondition};

    /// A small override file with a comment preamble and three sections.
    pub const TEXTURE_INI: &str = "\
; Mod generated by a texture tool
; edit with care

[TextureOverrideHair]
hash = 1a2b3c4d
run = CommandListHair

[TextureOverrideBody]
hash = 99ffee00
run = CommandListBody

[CommandListHair]
vb0 = ResourceHairVB
";

    /// The rules of [`texture_rules`] in the on-disk JSON shape.
    pub const TEXTURE_RULES_JSON: &str = r#"[
  {
    "name": "hair-alt",
    "priority": 10,
    "section_pattern": "^TextureOverrideHair",
    "action_value": "CommandListHairAlt",
    "conditions": [
      { "key": "hash", "value": "1a2b", "match_type": "startswith" }
    ]
  },
  {
    "name": "hair-old",
    "priority": 1,
    "section_pattern": "TextureOverrideHair",
    "action_key": "run",
    "action_value": "CommandListHairOld"
  },
  {
    "name": "body-priority",
    "section_pattern": "Body",
    "action_key": "match_priority",
    "action_value": "1"
  }
]"#;

    pub fn texture_rules() -> Vec<Rule> {
        vec![
            Rule::new("hair-alt", "^TextureOverrideHair", "run", "CommandListHairAlt")
                .with_priority(10)
                .with_condition(RuleCondition::new("hash", "1a2b", MatchType::StartsWith)),
            Rule::new("hair-old", "TextureOverrideHair", "run", "CommandListHairOld")
                .with_priority(1),
            Rule::new("body-priority", "Body", "match_priority", "1"),
        ]
    }

    #[test]
    fn json_fixture_matches_rules() {
        let path = std::path::Path::new("fixture.json");
        let rules = crate::loader::rules_from_str(TEXTURE_RULES_JSON, path).unwrap();
        assert_eq!(rules, texture_rules());
    }
}
