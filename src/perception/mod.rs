//! # Módulo Perception — Da Detecção ao Espaço de Conceitos
//!
//! A percepção em si (detector, segmentação, simulador) é externa. Este
//! módulo só recebe o tipo semântico detectado e o traduz para rótulos e
//! confianças de conceito, prontos para a
//! [camada de conceitos](crate::core::concept_layer).
//!
//! ```text
//! DetectionResult { detected_type: "mug" }
//!   └── map_detection_to_concepts(.., lexicon)
//!         └── ConceptAnnotation { labels: ["mug"], confidences: [1.0] }
//! ```

pub mod concept_mapping;

pub use concept_mapping::{map_detection_to_concepts, DetectionResult, Lexicon};
