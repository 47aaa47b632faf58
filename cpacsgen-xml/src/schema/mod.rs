pub mod xsd;
