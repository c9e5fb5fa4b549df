//! Integration Tests for the Scoring Context
//!
//! Model được inject qua trait, không cần ONNX Runtime.

#[cfg(test)]
mod integration_tests {
    use parking_lot::Mutex;

    use crate::logic::features::{
        FeatureError, FeatureProfile, FeatureSchema, FeatureVector, RawInput, YesNo, BUILDER_LAYOUT,
    };
    use crate::logic::model::{
        ArtifactError, Imputer, InferenceError, RiskModel, ScoringContext, ScoringError, ScoringOptions,
    };
    use crate::logic::risk::{RiskCategory, RiskThresholds};

    /// Always answers the same probability, remembers what it was given
    struct FixedModel {
        probability: f64,
        seen: Mutex<Option<Vec<f64>>>,
    }

    impl FixedModel {
        fn boxed(probability: f64) -> Box<dyn RiskModel> {
            Box::new(Self::new(probability))
        }

        fn new(probability: f64) -> Self {
            Self { probability, seen: Mutex::new(None) }
        }
    }

    impl RiskModel for FixedModel {
        fn name(&self) -> &str {
            "fixed"
        }

        fn predict_proba(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
            *self.seen.lock() = Some(features.values.clone());
            Ok(self.probability)
        }
    }

    struct FailingModel;

    impl RiskModel for FailingModel {
        fn name(&self) -> &str {
            "failing"
        }

        fn predict_proba(&self, _features: &FeatureVector) -> Result<f64, InferenceError> {
            Err(InferenceError::Run("session poisoned".into()))
        }
    }

    /// Lets a test inspect the vector after handing the model to the context
    struct SharedModel(std::sync::Arc<FixedModel>);

    impl RiskModel for SharedModel {
        fn name(&self) -> &str {
            self.0.name()
        }

        fn predict_proba(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
            self.0.predict_proba(features)
        }
    }

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

    fn v1_context(probability: f64) -> ScoringContext {
        ScoringContext::new(
            FeatureSchema::builder_default(),
            FixedModel::boxed(probability),
            None,
            ScoringOptions::default(),
        )
        .unwrap()
    }

    fn full_imputer(schema: &FeatureSchema) -> Imputer {
        Imputer {
            strategy: "median".into(),
            feature_names: schema.names().to_vec(),
            statistics: (0..schema.len()).map(|i| i as f64 + 0.5).collect(),
        }
    }

    #[test]
    fn test_banding_through_context() {
        for (p, expected) in [
            (0.2, RiskCategory::Safe),
            (0.37, RiskCategory::Safe),
            (0.45, RiskCategory::Warning),
            (0.50, RiskCategory::Warning),
            (0.60, RiskCategory::HighRisk),
            (0.75, RiskCategory::HighRisk),
        ] {
            let assessment = v1_context(p).score(&scenario()).unwrap();
            assert_eq!(assessment.band.category, expected, "p={}", p);
            assert_eq!(assessment.band.probability, p);
            assert_eq!(assessment.profile, FeatureProfile::V1);
            assert!(assessment.defaulted_features.is_empty());
        }
    }

    #[test]
    fn test_model_receives_schema_order() {
        let schema = FeatureSchema::new(vec![
            "GDP".into(),
            "approval_rate_1st".into(),
            "Nacionality".into(),
            "financial_risk".into(),
        ])
        .unwrap();
        let model = std::sync::Arc::new(FixedModel::new(0.3));
        let context = ScoringContext::new(
            schema,
            Box::new(SharedModel(model.clone())),
            None,
            ScoringOptions::default(),
        )
        .unwrap();

        let assessment = context.score(&scenario()).unwrap();
        let seen = model.seen.lock().clone().unwrap();

        assert_eq!(seen.len(), 4);
        assert_eq!(seen[0], 0.79);
        assert!((seen[1] - 0.8333).abs() < 1e-4);
        assert_eq!(seen[2], 0.0);
        assert_eq!(seen[3], 0.0);
        assert_eq!(assessment.defaulted_features, vec!["Nacionality".to_string()]);
    }

    #[test]
    fn test_strict_rejects_unknown_feature() {
        let schema = FeatureSchema::new(vec!["Gender".into(), "Nacionality".into()]).unwrap();
        let options = ScoringOptions { strict_features: true, ..Default::default() };
        let context = ScoringContext::new(schema, FixedModel::boxed(0.1), None, options).unwrap();

        match context.score(&scenario()) {
            Err(ScoringError::Feature(FeatureError::MissingFeatures(names))) => {
                assert_eq!(names, vec!["Nacionality".to_string()]);
            }
            other => panic!("expected missing feature error, got {:?}", other),
        }
    }

    #[test]
    fn test_v2_requires_imputer() {
        let options = ScoringOptions { profile: FeatureProfile::V2, ..Default::default() };
        let result = ScoringContext::new(FeatureSchema::builder_default(), FixedModel::boxed(0.1), None, options);
        assert!(matches!(result, Err(ArtifactError::MissingImputer)));
    }

    #[test]
    fn test_v2_rejects_mismatched_imputer() {
        let schema = FeatureSchema::builder_default();
        let mut imputer = full_imputer(&schema);
        imputer.feature_names.swap(0, 1);

        let options = ScoringOptions { profile: FeatureProfile::V2, ..Default::default() };
        let result = ScoringContext::new(schema, FixedModel::boxed(0.1), Some(imputer), options);
        assert!(matches!(result, Err(ArtifactError::ImputerMismatch(_))));
    }

    #[test]
    fn test_v2_imputes_missing_compound_indicators() {
        let schema = FeatureSchema::builder_default();
        let imputer = full_imputer(&schema);
        let options = ScoringOptions { profile: FeatureProfile::V2, ..Default::default() };
        let context = ScoringContext::new(schema.clone(), FixedModel::boxed(0.5), Some(imputer.clone()), options).unwrap();

        let input = RawInput { without_evaluations_1st: 3, grade_1st: 9.5, ..scenario() };
        let (vector, imputed) = context.prepare(&input).unwrap();

        assert_eq!(imputed, 3);
        for name in ["high_financial_risk", "low_grade_financial_risk", "no_scholarship_low_grade"] {
            let index = schema.index_of(name).unwrap();
            assert_eq!(vector.values[index], imputer.statistics[index]);
        }
        assert_eq!(vector.get_by_name(&schema, "inactive_1st"), Some(1.0));
        assert_eq!(vector.get_by_name(&schema, "low_grade_1st"), Some(1.0));

        let assessment = context.score(&input).unwrap();
        assert_eq!(assessment.imputed_cells, 3);
        assert_eq!(assessment.band.category, RiskCategory::Warning);
    }

    #[test]
    fn test_model_failure_surfaces() {
        let context = ScoringContext::new(
            FeatureSchema::builder_default(),
            Box::new(FailingModel),
            None,
            ScoringOptions::default(),
        )
        .unwrap();

        assert!(matches!(
            context.score(&scenario()),
            Err(ScoringError::Inference(InferenceError::Run(_)))
        ));
    }

    #[test]
    fn test_out_of_range_probability_rejected() {
        assert!(matches!(
            v1_context(1.5).score(&scenario()),
            Err(ScoringError::Inference(InferenceError::InvalidProbability(_)))
        ));
    }

    #[test]
    fn test_custom_thresholds() {
        let options = ScoringOptions {
            thresholds: RiskThresholds::new(0.1, 0.3).unwrap(),
            ..Default::default()
        };
        let context = ScoringContext::new(FeatureSchema::builder_default(), FixedModel::boxed(0.2), None, options).unwrap();
        assert_eq!(context.score(&scenario()).unwrap().band.category, RiskCategory::Warning);
        assert_eq!(context.classify(0.3).category, RiskCategory::HighRisk);
    }

    #[test]
    fn test_info() {
        let info = v1_context(0.2).info();
        assert_eq!(info.model_name, "fixed");
        assert_eq!(info.feature_count, BUILDER_LAYOUT.len());
        assert_eq!(info.layout_hash.len(), 8);
        assert!(info.imputer_strategy.is_none());
    }

    #[test]
    fn test_assessment_json() {
        let assessment = v1_context(0.45).score(&scenario()).unwrap();
        let json = serde_json::to_value(&assessment).unwrap();

        assert_eq!(json["category"], "warning");
        assert_eq!(json["probability_display"], "45.00%");
        assert_eq!(json["profile"], "v1");
        assert_eq!(json["color"], "#DE9B0B");
    }

    #[test]
    fn test_load_missing_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let result = ScoringContext::load_dir(dir.path(), ScoringOptions::default());
        assert!(matches!(result, Err(ArtifactError::Io { .. })));
    }
}
