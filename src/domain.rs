export![dome, image, material, settings, uv];
