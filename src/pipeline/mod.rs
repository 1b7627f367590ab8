pub mod stage1_preprocess;
pub mod stage2_calibrate;
pub mod stage3_rank;
pub mod stage4_enrichment;
pub mod stage5_bedroc;
pub mod stage6_orchestrate;
pub mod stage7_report;
