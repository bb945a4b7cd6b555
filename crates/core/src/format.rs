use crate::types::{CaptionStyle, ProcessingResult, Transcript};

/// Format seconds as MM:SS timestamp
pub fn format_timestamp(seconds: f64) -> String {
    let mins = (seconds / 60.0) as u32;
    let secs = (seconds % 60.0) as u32;
    format!("{:02}:{:02}", mins, secs)
}

/// Format transcript segments with timestamps
pub fn format_transcript_with_timestamps(transcript: &Transcript) -> String {
    transcript
        .segments
        .iter()
        .map(|seg| format!("[{}] {}", format_timestamp(seg.start), seg.text.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a processing result as a human-readable report
pub fn format_result_readable(result: &ProcessingResult) -> String {
    let mut output = String::new();

    output.push_str("# Video Caption Report\n\n");
    output.push_str(&format!(
        "**Duration:** {:.1}s | **Frame rate:** {:.1} fps | **Size:** {}x{}\n\n",
        result.video_info.duration,
        result.video_info.frame_rate,
        result.video_info.width,
        result.video_info.height
    ));

    output.push_str("## Transcript\n\n");
    if result.transcript.segments.is_empty() {
        output.push_str("_No speech detected._\n\n");
    } else {
        output.push_str(&format!(
            "**Language:** {} | **Confidence:** {:.2}\n\n",
            result.transcript.language, result.transcript.confidence
        ));
        output.push_str(&format_transcript_with_timestamps(&result.transcript));
        output.push_str("\n\n");
    }

    output.push_str("## Visual Summary\n\n");
    output.push_str(&format!(
        "**Scene:** {} | **Frames analyzed:** {}\n\n",
        result.visual_summary.scene_readable(),
        result.visual_summary.frame_count
    ));
    if !result.visual_summary.objects.is_empty() {
        output.push_str(&format!(
            "**Objects:** {}\n\n",
            result.visual_summary.objects.join(", ")
        ));
    }
    output.push_str(&result.visual_summary.description);
    output.push_str("\n\n");

    output.push_str("## Captions\n\n");
    for style in CaptionStyle::ALL {
        output.push_str(&format!("### {}\n\n", style.as_str()));
        output.push_str(result.captions.get(style));
        output.push_str("\n\n");
    }

    output.push_str(&format!(
        "_Processed in {:.2}s at {}_\n",
        result.processing_time, result.timestamp
    ));

    output
}
