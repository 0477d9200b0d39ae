//
// preprocess_workflows.rs
// Dicom-Preprocessor-rs
//
// Integration-style tests: synthetic DICOM files on disk through decoding, record building, aggregation and the written index.
//
// Thales Matheus Mendonça Santos - November 2025

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use dicom::core::{DataElement, PrimitiveValue, Tag, VR};
use dicom::dictionary_std::{tags, StandardDataDictionary};
use dicom::object::{FileDicomObject, FileMetaTableBuilder, InMemDicomObject};
use dicom::transfer_syntax::entries::EXPLICIT_VR_LITTLE_ENDIAN;
use dicom_preprocessor::decoder::{DicomDecoder, DicomFileDecoder};
use dicom_preprocessor::models::MetadataIndex;
use dicom_preprocessor::record::ImageRecordBuilder;
use dicom_preprocessor::{pipeline, PreprocessConfig, SkipReason};
use tempfile::{tempdir, TempDir};

const SOP_CLASS: &str = "1.2.840.10008.5.1.4.1.1.2";

/// One synthetic slice: extra attributes, 8-bit pixel payload (None = no Pixel Data) and frame count.
struct Slice {
    name: &'static str,
    attributes: Vec<(Tag, VR, &'static str)>,
    pixels: Option<Vec<u8>>,
    frames: u32,
}

impl Slice {
    fn ct(name: &'static str, instance: &'static str, pixels: Vec<u8>) -> Self {
        Slice {
            name,
            attributes: vec![
                (tags::PATIENT_NAME, VR::PN, "Test^Patient"),
                (tags::PATIENT_ID, VR::LO, "PAT123"),
                (tags::MODALITY, VR::CS, "CT"),
                (tags::STUDY_DATE, VR::DA, "20240101"),
                (tags::STUDY_TIME, VR::TM, "101500"),
                (tags::STUDY_DESCRIPTION, VR::LO, "HEAD W/O CONTRAST"),
                (tags::STUDY_INSTANCE_UID, VR::UI, "1.2.826.0.1.3680043.2.1125.10"),
                (tags::SERIES_INSTANCE_UID, VR::UI, "1.2.826.0.1.3680043.2.1125.10.1"),
                (tags::SERIES_NUMBER, VR::IS, "2"),
                (tags::SERIES_DESCRIPTION, VR::LO, "AXIAL 5mm"),
                (tags::INSTANCE_NUMBER, VR::IS, instance),
            ],
            pixels: Some(pixels),
            frames: 1,
        }
    }

    fn with(mut self, tag: Tag, vr: VR, value: &'static str) -> Self {
        self.attributes.retain(|(t, _, _)| *t != tag);
        self.attributes.push((tag, vr, value));
        self
    }
}

fn put(obj: &mut InMemDicomObject, tag: Tag, vr: VR, value: PrimitiveValue) {
    obj.put(DataElement::new(tag, vr, value));
}

fn write_slice(dir: &Path, slice: &Slice) -> PathBuf {
    let path = dir.join(slice.name);
    let instance_uid = format!(
        "1.2.826.0.1.3680043.2.1125.99.{}",
        slice.name.bytes().map(u32::from).sum::<u32>()
    );

    let mut obj = InMemDicomObject::new_empty_with_dict(StandardDataDictionary);
    for (tag, vr, value) in &slice.attributes {
        put(&mut obj, *tag, *vr, PrimitiveValue::from(*value));
    }
    put(&mut obj, tags::SOP_CLASS_UID, VR::UI, PrimitiveValue::from(SOP_CLASS));
    put(
        &mut obj,
        tags::SOP_INSTANCE_UID,
        VR::UI,
        PrimitiveValue::from(instance_uid.as_str()),
    );

    if let Some(pixels) = &slice.pixels {
        let per_frame = pixels.len() as u32 / slice.frames;
        let columns = 2_u16;
        let rows = (per_frame / columns as u32) as u16;
        put(&mut obj, tags::ROWS, VR::US, PrimitiveValue::from(rows));
        put(&mut obj, tags::COLUMNS, VR::US, PrimitiveValue::from(columns));
        put(&mut obj, tags::SAMPLES_PER_PIXEL, VR::US, PrimitiveValue::from(1_u16));
        put(&mut obj, tags::BITS_ALLOCATED, VR::US, PrimitiveValue::from(8_u16));
        put(&mut obj, tags::BITS_STORED, VR::US, PrimitiveValue::from(8_u16));
        put(&mut obj, tags::HIGH_BIT, VR::US, PrimitiveValue::from(7_u16));
        put(&mut obj, tags::PIXEL_REPRESENTATION, VR::US, PrimitiveValue::from(0_u16));
        put(
            &mut obj,
            tags::PHOTOMETRIC_INTERPRETATION,
            VR::CS,
            PrimitiveValue::from("MONOCHROME2"),
        );
        put(
            &mut obj,
            tags::NUMBER_OF_FRAMES,
            VR::IS,
            PrimitiveValue::from(slice.frames.to_string()),
        );
        put(&mut obj, tags::PIXEL_DATA, VR::OB, PrimitiveValue::from(pixels.clone()));
    }

    let meta = FileMetaTableBuilder::new()
        .transfer_syntax(EXPLICIT_VR_LITTLE_ENDIAN.uid())
        .media_storage_sop_class_uid(SOP_CLASS)
        .media_storage_sop_instance_uid(instance_uid.as_str())
        .build()
        .expect("meta");

    let mut file_obj = FileDicomObject::new_empty_with_dict_and_meta(StandardDataDictionary, meta);
    for elem in obj {
        file_obj.put(elem);
    }
    file_obj.write_to_file(&path).expect("write test dicom");
    path
}

fn input_tree(slices: &[Slice]) -> (TempDir, PathBuf, PathBuf) {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("DICOM").join("DIR000");
    fs::create_dir_all(&input).expect("create input");
    for slice in slices {
        write_slice(&input, slice);
    }
    let output = dir.path().join("processed");
    (dir, input, output)
}

fn config(dir: &TempDir, output: &Path) -> PreprocessConfig {
    let mut config = PreprocessConfig::new(dir.path().join("DICOM"), output);
    // Synthetic slices are far smaller than real ones.
    config.min_file_size = 0;
    config.source_media = "DVD-R".to_string();
    config.recovery_date = NaiveDate::from_ymd_opt(2025, 11, 20);
    config
}

#[test]
fn ct_series_with_one_damaged_file_end_to_end() {
    let (dir, _input, output) = input_tree(&[
        Slice::ct("IM0003", "3", vec![80, 60, 40, 20]),
        Slice::ct("IM0001", "1", vec![0, 40, 60, 80]),
        Slice::ct("IM0004", "4", vec![0, 0, 0, 0]),
        Slice::ct("IM0002", "2", vec![10, 20, 30, 40]),
    ]);

    let summary = pipeline::run(&config(&dir, &output)).expect("run");
    let index = &summary.index;

    assert_eq!(index.studies.len(), 1);
    assert_eq!(index.studies[0].series.len(), 1);
    let series = &index.studies[0].series[0];
    assert_eq!(series.slice_count, 3);
    assert_eq!(series.images.len(), 3);
    assert_eq!(series.rows, 2);
    assert_eq!(series.columns, 2);

    let info = &index.recovery_info;
    assert_eq!(info.total_files, 4);
    assert_eq!(info.intact_files, 3);
    assert_eq!(info.damaged_files, 1);
    assert_eq!(info.error_files, 0);
    assert_eq!(info.recovery_date, "2025-11-20");
    assert_eq!(info.source_media, "DVD-R");

    let study = &index.studies[0];
    assert!(study.series[0].images[0].starts_with("CT_HEAD_W-O_CONTRAST_"));
    assert!(series.images[0].ends_with("/series_001/slice_0001.png"));
    assert!(series.images[2].ends_with("/series_001/slice_0003.png"));
    for image in &series.images {
        assert!(output.join(image).is_file(), "missing {}", image);
    }

    // Slice 1 is instance 1: [0, 40, 60, 80] through the default CT window (40, 80).
    let first = image::open(output.join(&series.images[0]))
        .expect("open png")
        .to_luma8();
    assert_eq!(first.dimensions(), (2, 2));
    assert_eq!(first.as_raw(), &vec![0, 128, 191, 255]);

    let patient = index.patient.as_ref().expect("patient");
    assert_eq!(patient.name, "Test^Patient");
    assert_eq!(patient.id, "PAT123");
}

#[test]
fn written_index_matches_returned_document() {
    let (dir, _input, output) = input_tree(&[
        Slice::ct("A", "1", vec![1, 2, 3, 4]),
        Slice::ct("B", "2", vec![5, 6, 7, 8]),
    ]);
    let reports = dir.path().join("REPORTS");
    fs::create_dir_all(&reports).expect("reports dir");
    fs::write(reports.join("R1.TXT"), "EXAM: CT HEAD\nIMPRESSION: normal\n").expect("report");

    let mut config = config(&dir, &output);
    config.reports_dir = Some(reports);
    let summary = pipeline::run(&config).expect("run");

    let text = fs::read_to_string(output.join("metadata.json")).expect("read index");
    let parsed: MetadataIndex = serde_json::from_str(&text).expect("parse index");
    assert_eq!(parsed, summary.index);
    assert_eq!(parsed.reports["CT"], "EXAM: CT HEAD\nIMPRESSION: normal");

    let raw: serde_json::Value = serde_json::from_str(&text).expect("json");
    assert_eq!(raw["studies"][0]["series"][0]["sliceCount"], 2);
    assert_eq!(raw["studies"][0]["referringPhysician"], "");
    assert_eq!(raw["patient"]["birthDate"], "");
}

#[test]
fn studies_are_ordered_by_date_and_series_by_number() {
    let (dir, _input, output) = input_tree(&[
        Slice::ct("late", "1", vec![1, 2, 3, 4])
            .with(tags::STUDY_DATE, VR::DA, "20200101")
            .with(tags::STUDY_TIME, VR::TM, "1000")
            .with(tags::STUDY_INSTANCE_UID, VR::UI, "1.2.3.1"),
        Slice::ct("early", "1", vec![1, 2, 3, 4])
            .with(tags::STUDY_DATE, VR::DA, "20191231")
            .with(tags::STUDY_TIME, VR::TM, "2300")
            .with(tags::STUDY_INSTANCE_UID, VR::UI, "1.2.3.2")
            .with(tags::SERIES_INSTANCE_UID, VR::UI, "1.2.3.2.9")
            .with(tags::SERIES_NUMBER, VR::IS, "9"),
        Slice::ct("early2", "1", vec![1, 2, 3, 4])
            .with(tags::STUDY_DATE, VR::DA, "20191231")
            .with(tags::STUDY_TIME, VR::TM, "2300")
            .with(tags::STUDY_INSTANCE_UID, VR::UI, "1.2.3.2")
            .with(tags::SERIES_INSTANCE_UID, VR::UI, "1.2.3.2.3")
            .with(tags::SERIES_NUMBER, VR::IS, "3"),
    ]);

    let summary = pipeline::run(&config(&dir, &output)).expect("run");
    let studies = &summary.index.studies;
    assert_eq!(studies.len(), 2);
    assert_eq!(studies[0].uid, "1.2.3.2");
    assert_eq!(studies[1].uid, "1.2.3.1");

    let numbers: Vec<i64> = studies[0].series.iter().map(|s| s.number).collect();
    assert_eq!(numbers, vec![3, 9]);
    assert!(studies[0].series[1].images[0].contains("/series_002/"));
    assert_ne!(
        studies[0].series[0].images[0].split('/').next(),
        studies[1].series[0].images[0].split('/').next()
    );
}

#[test]
fn unreadable_and_pixelless_files_count_as_errors() {
    let mut no_pixels = Slice::ct("NOPIX", "1", Vec::new());
    no_pixels.pixels = None;
    let (dir, input, output) = input_tree(&[Slice::ct("GOOD", "1", vec![9, 8, 7, 6]), no_pixels]);
    fs::write(input.join("GARBAGE"), vec![0xAB; 2048]).expect("garbage");

    let summary = pipeline::run(&config(&dir, &output)).expect("run");
    let info = &summary.index.recovery_info;
    assert_eq!(info.total_files, 3);
    assert_eq!(info.intact_files, 1);
    assert_eq!(info.damaged_files, 0);
    assert_eq!(info.error_files, 2);
    assert_eq!(info.total_files, info.intact_files + info.damaged_files + info.error_files);
}

#[test]
fn decoder_classifies_failures() {
    let dir = tempdir().expect("tempdir");
    let garbage = dir.path().join("garbage.dcm");
    fs::write(&garbage, b"definitely not dicom").expect("write");
    let mut no_pixels = Slice::ct("nopix.dcm", "1", Vec::new());
    no_pixels.pixels = None;
    let no_pixels = write_slice(dir.path(), &no_pixels);

    let decoder = DicomFileDecoder;
    assert!(matches!(decoder.decode(&garbage), Err(SkipReason::Read(_))));
    assert_eq!(decoder.decode(&no_pixels).unwrap_err(), SkipReason::NoPixelData);
}

#[test]
fn decoder_accepts_missing_preamble_but_not_truncated_data() {
    let dir = tempdir().expect("tempdir");
    let full = write_slice(dir.path(), &Slice::ct("full.dcm", "1", vec![1, 2, 3, 4]));
    let bytes = fs::read(&full).expect("read");

    let bare = dir.path().join("bare.dcm");
    fs::write(&bare, &bytes[128..]).expect("write");
    let truncated = dir.path().join("truncated.dcm");
    fs::write(&truncated, &bytes[..160]).expect("write");

    let decoder = DicomFileDecoder;
    let raw = decoder.decode(&bare).expect("decode without preamble");
    assert_eq!(raw.samples.dim(), (1, 2, 2));
    assert!(matches!(decoder.decode(&truncated), Err(SkipReason::Read(_))));
}

#[test]
fn explicit_window_applies_after_rescale() {
    let dir = tempdir().expect("tempdir");
    let slice = Slice::ct("rescaled.dcm", "1", vec![0, 64, 128, 255])
        .with(tags::RESCALE_SLOPE, VR::DS, "2")
        .with(tags::RESCALE_INTERCEPT, VR::DS, "-1024")
        .with(tags::WINDOW_CENTER, VR::DS, "-800")
        .with(tags::WINDOW_WIDTH, VR::DS, "600");
    let path = write_slice(dir.path(), &slice);

    let record = ImageRecordBuilder::new(DicomFileDecoder)
        .build(&path)
        .expect("record");
    assert_eq!(record.window.center, -800.0);
    assert_eq!(record.window.width, 600.0);
    // Calibrated values -1024, -896, -768, -514 inside [-1100, -500].
    assert_eq!(
        record.pixels.iter().copied().collect::<Vec<u8>>(),
        vec![32, 87, 141, 249]
    );
    assert_eq!(record.metadata.series.number, 2);
    assert_eq!(record.metadata.study.description, "HEAD W/O CONTRAST");
}

#[test]
fn multi_frame_file_renders_middle_frame() {
    let dir = tempdir().expect("tempdir");
    let frames = [[10_u8; 4], [100; 4], [200; 4]].concat();
    let mut slice = Slice::ct("cine.dcm", "1", frames)
        .with(tags::WINDOW_CENTER, VR::DS, "127.5")
        .with(tags::WINDOW_WIDTH, VR::DS, "255");
    slice.frames = 3;
    let path = write_slice(dir.path(), &slice);

    let record = ImageRecordBuilder::new(DicomFileDecoder)
        .build(&path)
        .expect("record");
    assert_eq!(record.pixels.dim(), (2, 2));
    assert!(record.pixels.iter().all(|&v| v == 100));
}

#[test]
fn missing_input_root_aborts_before_processing() {
    let dir = tempdir().expect("tempdir");
    let output = dir.path().join("processed");
    let config = PreprocessConfig::new(dir.path().join("nowhere"), &output);
    assert!(pipeline::run(&config).is_err());
    assert!(!output.exists());
}
