use std::path::PathBuf;

fn main() {
    let protoc = protoc_bin_vendored::protoc_bin_path().expect("failed to find protoc");
    // SAFETY: build scripts run single-threaded.
    unsafe { std::env::set_var("PROTOC", protoc) };

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));

    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .file_descriptor_set_path(out_dir.join("permissions_descriptor.bin"))
        .compile_protos(&["proto/permissions/v1/permissions.proto"], &["proto"])
        .expect("failed to compile permissions proto");
}
