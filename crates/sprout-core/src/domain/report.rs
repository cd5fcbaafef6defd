//! Markdown rendering of an [`EnvironmentReport`].
//!
//! Pure: no I/O, no panics. Tools missing from the report render as
//! "Not checked" with a warning glyph.

use std::fmt::Write as _;

use super::environment::{EnvironmentReport, Tool, ToolStatus};

/// Renders the requirements document written next to a generated project.
#[derive(Debug, Clone, Default)]
pub struct RequirementsReporter {
    project_name: Option<String>,
}

impl RequirementsReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name the `.xcodeproj` in the setup instructions.
    pub fn project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }

    /// Render `report` for a project targeting `target_version`.
    pub fn render(&self, report: &EnvironmentReport, target_version: &str) -> String {
        let mut doc = String::with_capacity(4096);

        doc.push_str("# iOS Development Requirements\n\n");
        self.write_table(&mut doc, report);
        self.write_deployment(&mut doc, report, target_version);
        doc.push_str(RECOMMENDED_VERSIONS);
        doc.push_str(INSTALLATION);
        doc.push_str(VERIFICATION);
        self.write_setup(&mut doc);
        doc.push_str(TROUBLESHOOTING);

        doc
    }

    fn write_table(&self, doc: &mut String, report: &EnvironmentReport) {
        doc.push_str("## Detected Versions\n\n");
        doc.push_str("| Tool | Version | Status |\n");
        doc.push_str("|------|---------|--------|\n");

        for tool in Tool::ALL {
            let glyph = report
                .status(tool)
                .unwrap_or(ToolStatus::Warn)
                .glyph();
            // writing to a String cannot fail
            let _ = writeln!(
                doc,
                "| **{}** | {} | {} |",
                tool.display_name(),
                report.detection_text(tool),
                glyph
            );
        }
        doc.push('\n');
    }

    fn write_deployment(&self, doc: &mut String, report: &EnvironmentReport, target_version: &str) {
        let target = match target_version.trim() {
            "" => "not set",
            v => v,
        };

        doc.push_str("## iOS Deployment Target\n\n");
        let _ = writeln!(doc, "- **Project minimum**: iOS {target}");
        let _ = writeln!(
            doc,
            "- **Supported by installed Xcode**: {}\n",
            report.recommended_deployment_target()
        );
    }

    fn write_setup(&self, doc: &mut String) {
        let project = self.project_name.as_deref().unwrap_or("YourProject");

        doc.push_str("## Project Setup\n\n");
        doc.push_str("1. **Open the project**:\n");
        let _ = writeln!(doc, "   ```bash\n   open {project}.xcodeproj\n   ```\n");
        doc.push_str("2. **Select your target device**:\n");
        doc.push_str("   - iOS Simulator (recommended for development)\n");
        doc.push_str("   - Physical iOS device (requires Apple Developer account)\n\n");
        doc.push_str("3. **Build and run**:\n");
        doc.push_str("   - Press `Cmd + R` in Xcode\n");
        doc.push_str("   - Or use the Play button in the toolbar\n\n");
    }
}

/// `render` with no project name.
pub fn render(report: &EnvironmentReport, target_version: &str) -> String {
    RequirementsReporter::new().render(report, target_version)
}

const RECOMMENDED_VERSIONS: &str = "\
## Recommended Versions

- **Xcode**: 15.0 or higher
- **Swift**: 5.9 or higher
- **macOS**: 13.0 (Ventura) or higher
- **iOS Deployment Target**: 15.0 or higher

";

const INSTALLATION: &str = "\
## Installation Instructions

### Xcode
1. Download from the Mac App Store: https://apps.apple.com/app/xcode/id497799835
2. Or download from Apple Developer: https://developer.apple.com/xcode/

### Homebrew (Package Manager)
```bash
/bin/bash -c \"$(curl -fsSL https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh)\"
```

### CocoaPods (Dependency Manager)
```bash
# Using Homebrew
brew install cocoapods

# Or using gem
sudo gem install cocoapods
```

### Swift Package Manager
Comes bundled with Xcode, no separate installation needed.

";

const VERIFICATION: &str = "\
## Verification

Run these commands to verify your setup:

```bash
xcodebuild -version
swift --version
pod --version
brew --version
```

";

const TROUBLESHOOTING: &str = "\
## Troubleshooting

### Common Issues

1. **Xcode not found**: Install Xcode from the Mac App Store
2. **Simulator not working**: Reset simulator via Xcode → Window → Devices and Simulators
3. **Build errors**: Clean build folder (Cmd + Shift + K) and rebuild

### Performance Tips

- Use iOS Simulator for faster development cycles
- Enable \"Metal API Validation\" in simulator for better debugging
- Use Xcode's built-in Instruments for performance profiling

---
*This file was generated by sprout*
";
