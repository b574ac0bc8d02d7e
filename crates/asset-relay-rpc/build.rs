fn main() {
	// The message types live in `src/lib.rs`; only the service and client
	// stubs are generated, so no protoc is needed at build time.
	let get_static_file = tonic_build::manual::Method::builder()
		.name("get_static_file")
		.route_name("GetStaticFile")
		.input_type("crate::proto::GetStaticFileRequest")
		.output_type("crate::proto::GetStaticFileReply")
		.codec_path("tonic_prost::ProstCodec")
		.build();

	let service = tonic_build::manual::Service::builder()
		.name("AssetCache")
		.package("assetrelay")
		.method(get_static_file)
		.build();

	tonic_build::manual::Builder::new().compile(&[service]);
}
