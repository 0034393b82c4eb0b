use shadow_rs::ShadowBuilder;

fn main() {
    // Build metadata behind `courier-rs --version`
    ShadowBuilder::builder()
        .build()
        .expect("Failed to generate build metadata");
}
