fn main() {
    goss_provisioner::app::cli::run();
}
