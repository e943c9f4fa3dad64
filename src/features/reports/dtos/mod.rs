mod report_dto;

pub use report_dto::{
    AssignedReportResponseDto, AssignmentResponseDto, CreateReportDto, PublicReportResponseDto,
    ReportDetailResponseDto, ReportResponseDto, UpdateReportStatusDto,
};
