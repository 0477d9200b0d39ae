use dicom_core::Tag;
use dicom_dictionary_std::tags;

use crate::dicom_access::ElementAccess;
use crate::models::{ImageMetadata, PatientInfo, SeriesInfo, StudyInfo};

/// Every attribute the record builder reads from a source file.
pub const RECORD_TAGS: &[Tag] = &[
    tags::PATIENT_NAME,
    tags::PATIENT_ID,
    tags::PATIENT_BIRTH_DATE,
    tags::PATIENT_SEX,
    tags::STUDY_DATE,
    tags::STUDY_TIME,
    tags::STUDY_DESCRIPTION,
    tags::STUDY_INSTANCE_UID,
    tags::SERIES_DESCRIPTION,
    tags::SERIES_INSTANCE_UID,
    tags::SERIES_NUMBER,
    tags::INSTANCE_NUMBER,
    tags::MODALITY,
    tags::INSTITUTION_NAME,
    tags::REFERRING_PHYSICIAN_NAME,
    tags::ACCESSION_NUMBER,
    tags::BODY_PART_EXAMINED,
    tags::ROWS,
    tags::COLUMNS,
    tags::SLICE_LOCATION,
    tags::RESCALE_SLOPE,
    tags::RESCALE_INTERCEPT,
    tags::WINDOW_CENTER,
    tags::WINDOW_WIDTH,
];

pub fn extract_patient<T: ElementAccess>(obj: &T) -> PatientInfo {
    PatientInfo {
        name: obj.text(tags::PATIENT_NAME),
        id: obj.text(tags::PATIENT_ID),
        birth_date: obj.text(tags::PATIENT_BIRTH_DATE),
        sex: obj.text(tags::PATIENT_SEX),
    }
}

pub fn extract_study<T: ElementAccess>(obj: &T) -> StudyInfo {
    StudyInfo {
        uid: obj.text(tags::STUDY_INSTANCE_UID),
        date: obj.text(tags::STUDY_DATE),
        time: obj.text(tags::STUDY_TIME),
        description: obj.text(tags::STUDY_DESCRIPTION),
        modality: obj.text(tags::MODALITY),
        institution: obj.text(tags::INSTITUTION_NAME),
        referring_physician: obj.text(tags::REFERRING_PHYSICIAN_NAME),
        accession: obj.text(tags::ACCESSION_NUMBER),
    }
}

pub fn extract_series<T: ElementAccess>(obj: &T) -> SeriesInfo {
    SeriesInfo {
        uid: obj.text(tags::SERIES_INSTANCE_UID),
        number: obj.int(tags::SERIES_NUMBER, 0),
        description: obj.text(tags::SERIES_DESCRIPTION),
        body_part: obj.text(tags::BODY_PART_EXAMINED),
    }
}

pub fn extract_image_metadata<T: ElementAccess>(obj: &T) -> ImageMetadata {
    ImageMetadata {
        patient: extract_patient(obj),
        study: extract_study(obj),
        series: extract_series(obj),
        instance_number: obj.int(tags::INSTANCE_NUMBER, 0),
        slice_location: obj.float(tags::SLICE_LOCATION, 0.0),
        rows: obj.int(tags::ROWS, 0),
        columns: obj.int(tags::COLUMNS, 0),
    }
}
