use uidiff_rs::{
    ChangeType, Classification, ClassificationConfig, Classifier, CustomRule, RuleCondition,
    StyleCategory,
};

fn classify(
    config: &ClassificationConfig,
    element: &str,
    property: &str,
    change_type: ChangeType,
    magnitude: f64,
) -> Classification {
    Classifier::new(config).classify_parts(element, property, &change_type, magnitude)
}

#[test]
fn test_interactive_selector_wins_over_everything() {
    let config = ClassificationConfig::default();
    let color = ChangeType::Style(StyleCategory::Color);

    assert_eq!(
        classify(&config, "button.primary", "color", color.clone(), 0.01),
        Classification::Critical
    );
    assert_eq!(
        classify(&config, "FORM#login input", "width", ChangeType::Style(StyleCategory::Dimension), 0.0),
        Classification::Critical
    );
    assert_eq!(
        classify(&config, "div#box", "color", color, 0.01),
        Classification::Noise
    );
}

#[test]
fn test_structural_is_critical() {
    let config = ClassificationConfig::default();
    assert_eq!(
        classify(&config, "div#box", "element_existence", ChangeType::Structural, 0.0),
        Classification::Critical
    );
    assert_eq!(
        classify(&config, "div#box", "element_moved", ChangeType::Layout, 0.0),
        Classification::Critical
    );
}

#[test]
fn test_accessibility_property_is_critical() {
    let config = ClassificationConfig::default();
    for property in ["attr_aria-label", "attr_alt", "attr_role"] {
        assert_eq!(
            classify(&config, "img#logo", property, ChangeType::Attribute, 0.5),
            Classification::Critical,
            "{}",
            property
        );
    }
}

#[test]
fn test_text_tiers() {
    let config = ClassificationConfig::default();
    let text = |m| classify(&config, "p#intro", "text", ChangeType::Text, m);

    assert_eq!(text(0.5), Classification::Critical);
    assert_eq!(text(0.4), Classification::Cosmetic);
    assert_eq!(text(0.25), Classification::Cosmetic);
    assert_eq!(text(0.2), Classification::Noise);
}

#[test]
fn test_layout_tiers() {
    let config = ClassificationConfig::default();
    assert_eq!(
        classify(&config, "div#box", "position_x", ChangeType::Layout, 0.05),
        Classification::Cosmetic
    );
    assert_eq!(
        classify(&config, "div#box", "position_y", ChangeType::Layout, 0.01),
        Classification::Noise
    );
}

#[test]
fn test_color_and_font_family_never_critical() {
    let config = ClassificationConfig::default();
    assert_eq!(
        classify(&config, "div#box", "background-color", ChangeType::Style(StyleCategory::Color), 1.0),
        Classification::Cosmetic
    );
    assert_eq!(
        classify(&config, "div#box", "font-family", ChangeType::Style(StyleCategory::Typography), 1.0),
        Classification::Cosmetic
    );
    assert_eq!(
        classify(&config, "div#box", "color", ChangeType::Style(StyleCategory::Color), 0.29),
        Classification::Noise
    );
}

#[test]
fn test_other_style_tiers() {
    let config = ClassificationConfig::default();
    let style = |m| {
        classify(
            &config,
            "div#box",
            "width",
            ChangeType::Style(StyleCategory::Dimension),
            m,
        )
    };
    assert_eq!(style(0.8), Classification::Critical);
    assert_eq!(style(0.5), Classification::Cosmetic);
    assert_eq!(style(0.1), Classification::Noise);
}

#[test]
fn test_custom_rules_need_advanced_flag() {
    let mut config = ClassificationConfig::default();
    config.custom_rules = vec![CustomRule::new(Classification::Critical)
        .when(RuleCondition::PropertyContains("href".to_string()))
        .when(RuleCondition::ChangeTypeIs(ChangeType::Attribute))];

    assert_eq!(
        classify(&config, "li#next", "attr_href", ChangeType::Attribute, 0.5),
        Classification::Noise
    );

    config.advanced = true;
    assert_eq!(
        classify(&config, "li#next", "attr_href", ChangeType::Attribute, 0.5),
        Classification::Critical
    );
    assert_eq!(
        classify(&config, "li#next", "attr_title", ChangeType::Attribute, 0.5),
        Classification::Noise
    );
}

#[test]
fn test_first_matching_custom_rule_wins() {
    let mut config = ClassificationConfig::default();
    config.advanced = true;
    config.custom_rules = vec![
        CustomRule::new(Classification::Cosmetic).when(RuleCondition::MinMagnitude(0.9)),
        CustomRule::new(Classification::Critical)
            .when(RuleCondition::PropertyContains("data-".to_string())),
    ];

    assert_eq!(
        classify(&config, "li#row", "attr_data-id", ChangeType::Attribute, 1.0),
        Classification::Cosmetic
    );
    assert_eq!(
        classify(&config, "li#row", "attr_data-id", ChangeType::Attribute, 0.5),
        Classification::Critical
    );
}

#[test]
fn test_custom_rules_cannot_override_earlier_rules() {
    let mut config = ClassificationConfig::default();
    config.advanced = true;
    config.custom_rules = vec![CustomRule::new(Classification::Critical)];

    assert_eq!(
        classify(&config, "div#box", "width", ChangeType::Style(StyleCategory::Dimension), 0.1),
        Classification::Noise
    );
    assert_eq!(
        classify(&config, "li#row", "attr_title", ChangeType::Attribute, 0.5),
        Classification::Critical
    );
}

#[test]
fn test_configured_keywords() {
    let mut config = ClassificationConfig::default();
    config.interactive_keywords = vec!["checkout".to_string()];
    config.accessibility_keywords = vec![];

    assert_eq!(
        classify(&config, "section#checkout p", "text", ChangeType::Text, 0.0),
        Classification::Critical
    );
    assert_eq!(
        classify(&config, "button#go", "attr_aria-label", ChangeType::Attribute, 0.5),
        Classification::Noise
    );
}
