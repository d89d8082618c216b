pub mod case_study;
