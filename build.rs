//! Build script for fwtui
//!
//! Embeds build-time information (git commit, build timestamp) so the log
//! file records exactly which build touched the firewall.

fn main() {
    shadow_rs::ShadowBuilder::builder()
        .build()
        .expect("Failed to generate build info");
}
