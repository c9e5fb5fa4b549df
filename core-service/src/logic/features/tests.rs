//! Integration Tests for Feature Construction
//!
//! Builder + reindex chạy cùng nhau trên các kịch bản form thực tế.

#[cfg(test)]
mod integration_tests {
    use crate::logic::features::{
        BuilderConfig, FeatureBuilder, FeatureProfile, FeatureSchema, FeatureVector,
        MissingFeaturePolicy, RawInput, YesNo, BUILDER_LAYOUT,
    };

    fn scenario() -> RawInput {
        RawInput {
            enrolled_1st: 6,
            approved_1st: 5,
            grade_1st: 12.0,
            debtor: YesNo::No,
            tuition_fees_up_to_date: YesNo::Yes,
            scholarship_holder: YesNo::No,
            ..RawInput::default()
        }
    }

    /// Reference scenario: 5 of 6 units, grade 12, no debts, fees paid
    #[test]
    fn test_reference_scenario_v1() {
        let frame = FeatureBuilder::for_profile(FeatureProfile::V1).build(&scenario());

        let rate = frame.get("approval_rate_1st").unwrap();
        assert!((rate - 0.8333).abs() < 1e-4);
        assert_eq!(rate, 5.0 / (6.0 + 1e-5));
        assert_eq!(frame.get("academic_efficiency"), Some(rate));
        assert_eq!(frame.get("financial_risk"), Some(0.0));
        assert_eq!(frame.get("low_grade_1st"), Some(0.0));
        assert_eq!(frame.get("high_financial_risk"), Some(0.0));
        assert_eq!(frame.get("no_scholarship_low_grade"), Some(0.0));
        assert_eq!(frame.get("Curricular_units_1st_sem_evaluations"), Some(5.0));
        assert_eq!(frame.get("total_enrolled"), Some(6.0));
    }

    /// V1 produces every feature of the builder layout
    #[test]
    fn test_v1_covers_builder_layout() {
        let frame = FeatureBuilder::for_profile(FeatureProfile::V1).build(&scenario());
        assert_eq!(frame.produced().count(), BUILDER_LAYOUT.len());

        let vector = FeatureVector::reindex(
            &frame,
            &FeatureSchema::builder_default(),
            MissingFeaturePolicy::Strict,
        );
        assert!(vector.is_ok());
    }

    /// V2 leaves the compound indicators to the imputer
    #[test]
    fn test_v2_omits_compound_indicators() {
        let frame = FeatureBuilder::for_profile(FeatureProfile::V2).build(&scenario());

        assert_eq!(frame.get("high_financial_risk"), None);
        assert_eq!(frame.get("low_grade_financial_risk"), None);
        assert_eq!(frame.get("no_scholarship_low_grade"), None);
        assert_eq!(frame.produced().count(), BUILDER_LAYOUT.len() - 3);
    }

    #[test]
    fn test_low_grade_boundary_differs_between_profiles() {
        let input = RawInput { grade_1st: 10.5, ..scenario() };

        let v1 = FeatureBuilder::for_profile(FeatureProfile::V1).build(&input);
        let v2 = FeatureBuilder::for_profile(FeatureProfile::V2).build(&input);

        assert_eq!(v1.get("low_grade_1st"), Some(1.0));
        assert_eq!(v2.get("low_grade_1st"), Some(0.0));
    }

    #[test]
    fn test_inactive_only_tracked_by_v2() {
        let input = RawInput { without_evaluations_1st: 2, ..scenario() };

        let v1 = FeatureBuilder::for_profile(FeatureProfile::V1).build(&input);
        assert_eq!(v1.get("inactive_1st"), Some(0.0));
        assert_eq!(v1.get("Curricular_units_1st_sem_without_evaluations"), Some(0.0));

        let v2 = FeatureBuilder::for_profile(FeatureProfile::V2).build(&input);
        assert_eq!(v2.get("inactive_1st"), Some(1.0));
        assert_eq!(v2.get("Curricular_units_1st_sem_without_evaluations"), Some(2.0));
    }

    #[test]
    fn test_financial_indicators() {
        let input = RawInput {
            debtor: YesNo::Yes,
            scholarship_holder: YesNo::No,
            grade_1st: 9.0,
            ..scenario()
        };
        let frame = FeatureBuilder::new(BuilderConfig::v1()).build(&input);

        assert_eq!(frame.get("financial_risk"), Some(1.0));
        assert_eq!(frame.get("high_financial_risk"), Some(1.0));
        assert_eq!(frame.get("low_grade_financial_risk"), Some(1.0));
        assert_eq!(frame.get("no_scholarship_low_grade"), Some(1.0));

        // Unpaid tuition alone is enough
        let input = RawInput {
            debtor: YesNo::No,
            tuition_fees_up_to_date: YesNo::No,
            ..scenario()
        };
        let frame = FeatureBuilder::new(BuilderConfig::v1()).build(&input);
        assert_eq!(frame.get("financial_risk"), Some(1.0));
        assert_eq!(frame.get("high_financial_risk"), Some(0.0));
    }

    #[test]
    fn test_zero_enrolled_stays_finite() {
        let input = RawInput { enrolled_1st: 0, approved_1st: 0, ..scenario() };
        let frame = FeatureBuilder::default().build(&input);

        assert_eq!(frame.get("approval_rate_1st"), Some(0.0));
        assert!(frame.produced().all(|(_, v)| v.is_finite()));
    }

    /// Column set/order equals the schema whatever the input
    #[test]
    fn test_vector_order_matches_schema_for_any_input() {
        let schema = FeatureSchema::new(
            BUILDER_LAYOUT.iter().rev().map(|d| d.name.to_string()).collect(),
        )
        .unwrap();

        for enrolled in [0u32, 1, 6, 20] {
            for grade in [0.0, 9.99, 11.0, 20.0] {
                for debtor in [YesNo::Yes, YesNo::No] {
                    let input = RawInput { enrolled_1st: enrolled, grade_1st: grade, debtor, ..scenario() };
                    let frame = FeatureBuilder::default().build(&input);
                    let vector = FeatureVector::reindex(&frame, &schema, MissingFeaturePolicy::FillZero).unwrap();

                    assert_eq!(vector.len(), schema.len());
                    assert!(vector.validate(&schema).is_ok());
                    for (name, value) in schema.names().iter().zip(vector.as_slice()) {
                        assert_eq!(frame.get(name), Some(*value), "column {}", name);
                    }
                }
            }
        }
    }
}
