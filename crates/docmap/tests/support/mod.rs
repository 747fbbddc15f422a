#![allow(dead_code)]

mod memory;
pub use memory::Memory;

mod observer;
pub use observer::{Canned, Event, Recorder, Reject};

mod query;

use docmap::{
    Connector, Model, ModelSettings, Property, PropertyType, ScalarType, Schema, Settings,
};

pub const HEX: &str = "5f1d7a3b9c8e4f2a1b3c4d5e";
pub const HEX2: &str = "5f1d7a3b9c8e4f2a1b3c4d5f";

pub fn schema() -> Schema {
    Schema::builder()
        .model(
            Model::builder("Customer")
                .property("id", Property::new(PropertyType::ObjectId).id())
                .property("name", ScalarType::String)
                .property("email", Property::new(ScalarType::String).field_name("email_address"))
                .property("age", ScalarType::Number)
                .property("balance", Property::new(ScalarType::String).data_type("Decimal128"))
                .property("vendor", Property::new(ScalarType::String).data_type("ObjectID"))
                .property("tags", PropertyType::array(ScalarType::String))
                .collection("customers"),
        )
        .model(
            Model::builder("Product")
                .property("id", Property::new(ScalarType::Number).id())
                .property("name", ScalarType::String)
                .property("price", ScalarType::Number),
        )
        .model(
            Model::builder("Note")
                .property("title", ScalarType::String)
                .property("body", ScalarType::String),
        )
        .model(
            Model::builder("Event")
                .property("name", ScalarType::String)
                .settings(ModelSettings {
                    disable_default_sort: Some(true),
                    allow_extended_operators: Some(true),
                    ..Default::default()
                }),
        )
        .build()
        .unwrap()
}

pub fn connector(memory: &Memory) -> Connector {
    connector_with(memory, Settings::default())
}

pub fn connector_with(memory: &Memory, settings: Settings) -> Connector {
    init_tracing();

    Connector::builder()
        .schema(schema())
        .settings(settings)
        .build(memory.clone())
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
